//! Closed, integer-backed enumerations.
//!
//! Every enumeration is declared through [`wire_enum!`], which generates the
//! bidirectional value and name tables from a single member list so they
//! cannot drift apart. Decoding never fails: a wire value without a named
//! member becomes `Unknown(raw)` and re-encodes to the same raw value.
//! An `Unknown(raw)` built by hand around a named member's value is refused
//! on encode.

use crate::bits::{BitReader, BitWriter};
use crate::codec::CodecError;

pub trait WireEnum: Copy + Eq + Sized + 'static {
    /// Enumeration name, used in error messages.
    const FAMILY: &'static str;
    /// Wire width in bits.
    const WIDTH: u8;

    fn from_wire(value: u64) -> Self;

    fn to_wire(self) -> u64;

    /// Canonical member name; `"UNKNOWN"` for unmapped values.
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;

    /// Every named member, in declaration order.
    fn members() -> &'static [Self];

    fn is_unknown(self) -> bool;

    fn read(r: &mut BitReader<'_>) -> Result<Self, CodecError> {
        r.read_uint(Self::WIDTH).map(Self::from_wire)
    }

    /// The member the wire value of `self` decodes to. Differs from `self`
    /// only for an `Unknown(raw)` whose raw value has a named member.
    fn canonical(self) -> Self {
        Self::from_wire(self.to_wire())
    }

    /// Writes the wire value. `Unknown(raw)` is rejected when `raw` belongs
    /// to a named member, since it would decode as that member.
    fn write(self, w: &mut BitWriter) -> Result<(), CodecError> {
        if self.is_unknown() && !self.canonical().is_unknown() {
            return Err(CodecError::Validation(format!(
                "{} value {:#x} is {}, not an unknown value",
                Self::FAMILY,
                self.to_wire(),
                self.canonical().name()
            )));
        }
        w.write_uint(Self::WIDTH, self.to_wire())
    }
}

/// Declares a wire enumeration.
///
/// ```ignore
/// wire_enum! {
///     pub enum KnxLayer: u8, width 8 {
///         TunnelLinkLayer = 0x02 => "TUNNEL_LINK_LAYER",
///     }
/// }
/// ```
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty, width $width:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Wire value with no named member.
            Unknown($repr),
        }

        impl $name {
            pub const MEMBERS: &'static [$name] = &[$($name::$variant),+];

            pub fn value(self) -> $repr {
                match self {
                    $( $name::$variant => $value, )+
                    $name::Unknown(raw) => raw,
                }
            }
        }

        impl $crate::enumeration::WireEnum for $name {
            const FAMILY: &'static str = stringify!($name);
            const WIDTH: u8 = $width;

            fn from_wire(value: u64) -> Self {
                match value {
                    $( v if v == $value as u64 => $name::$variant, )+
                    other => $name::Unknown(other as $repr),
                }
            }

            fn to_wire(self) -> u64 {
                self.value() as u64
            }

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                    $name::Unknown(_) => "UNKNOWN",
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn members() -> &'static [Self] {
                Self::MEMBERS
            }

            fn is_unknown(self) -> bool {
                matches!(self, $name::Unknown(_))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $name::Unknown(raw) => write!(f, "UNKNOWN({:#x})", raw),
                    other => f.write_str($crate::enumeration::WireEnum::name(*other)),
                }
            }
        }
    };
}

pub(crate) use wire_enum;
