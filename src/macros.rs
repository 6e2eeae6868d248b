//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for enums whose
/// text form is their wire value.
///
/// Parsing is case-insensitive; display always yields the canonical value.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::DeskError;
///
/// enum_display_fromstr!(
///     MyEnum,
///     DeskError::InvalidMyEnum,
///     {
///         Variant1 => "Variant 1",
///         Variant2 => "Variant 2",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl $enum_name {
            /// Every value in declaration order.
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant),+];

            /// The wire value of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::DeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok($enum_name::$variant);
                    }
                )+
                Err($error_variant(s.to_string()))
            }
        }
    };
}
