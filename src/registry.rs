//! Fixed conversion registry between host scalar types and Ruby VALUEs.
//!
//! Every scalar family maps to a parse tag consumed by `MriParseArgsTo`, the
//! C type the thunk declares, and the conversion macros in both directions.
//! This is the single table the generator consults; adding a scalar family
//! means adding one row here.

use crate::types::Scalar;

/// One conversion row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarConv {
    /// Argument parse tag for `MriParseArgsTo`.
    pub parse_tag: char,
    /// C type the thunk declares for the parsed argument.
    pub c_type: &'static str,
    /// C++ value to Ruby VALUE.
    pub to_value: &'static str,
    /// Ruby VALUE to C++ value.
    pub from_value: &'static str,
}

/// Conversion row for host string types.
pub const TEXT_CONV: ScalarConv = ScalarConv {
    parse_tag: 's',
    c_type: "std::string",
    to_value: "MRI_STRING_VALUE",
    from_value: "MRI_FROM_STRING",
};

/// Parse tag for arguments received as raw VALUEs (handles and sequences).
pub const OBJECT_TAG: char = 'o';

pub fn scalar_conv(scalar: Scalar) -> ScalarConv {
    match scalar {
        // Narrow integers ride the plain int conversion.
        Scalar::I8 | Scalar::U8 | Scalar::I16 | Scalar::U16 | Scalar::I32 => ScalarConv {
            parse_tag: 'i',
            c_type: "int32_t",
            to_value: "INT2NUM",
            from_value: "NUM2INT",
        },
        Scalar::U32 => ScalarConv {
            parse_tag: 'u',
            c_type: "uint32_t",
            to_value: "UINT2NUM",
            from_value: "NUM2UINT",
        },
        Scalar::I64 => ScalarConv {
            parse_tag: 'l',
            c_type: "int64_t",
            to_value: "LL2NUM",
            from_value: "NUM2LL",
        },
        Scalar::U64 => ScalarConv {
            parse_tag: 'p',
            c_type: "uint64_t",
            to_value: "ULL2NUM",
            from_value: "NUM2ULL",
        },
        Scalar::Bool => ScalarConv {
            parse_tag: 'b',
            c_type: "bool",
            to_value: "MRI_BOOL_VALUE",
            from_value: "MRI_FROM_BOOL",
        },
        // Ruby floats are doubles; the call site narrows back to float.
        Scalar::F32 | Scalar::F64 => ScalarConv {
            parse_tag: 'f',
            c_type: "double",
            to_value: "DBL2NUM",
            from_value: "NUM2DBL",
        },
    }
}

/// Row used when a referenced type resolves to nothing; the caller pairs it
/// with a warning diagnostic.
pub fn unknown_conv() -> ScalarConv {
    scalar_conv(Scalar::I32)
}
