/// How a text field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Line,
    Area,
    Choice(&'static [&'static str]),
}

/// Declares a record made only of free-text fields together with a closed
/// enum naming those fields.
///
/// The enum carries the JSON key, display label, UI group and input kind of
/// every field, and the record gets `get`/`set` accessors keyed by the enum.
macro_rules! text_record {
    (
        $(#[$meta:meta])*
        pub struct $record:ident;
        pub enum $field:ident in $group:ident {
            $( $variant:ident => $member:ident, $label:literal, $section:ident, $kind:expr; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct $record {
            $( pub $member: String, )+
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $field {
            $( $variant, )+
        }

        impl $field {
            pub const ALL: &'static [$field] = &[ $( $field::$variant, )+ ];

            pub fn key(self) -> &'static str {
                match self {
                    $( $field::$variant => stringify!($member), )+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $( $field::$variant => $label, )+
                }
            }

            pub fn group(self) -> $group {
                match self {
                    $( $field::$variant => $group::$section, )+
                }
            }

            pub fn kind(self) -> $crate::core::fields::InputKind {
                #[allow(unused_imports)]
                use $crate::core::fields::InputKind::*;
                match self {
                    $( $field::$variant => $kind, )+
                }
            }

            pub fn in_group(group: $group) -> impl Iterator<Item = $field> {
                Self::ALL.iter().copied().filter(move |field| field.group() == group)
            }
        }

        impl $record {
            pub fn get(&self, field: $field) -> &str {
                match field {
                    $( $field::$variant => &self.$member, )+
                }
            }

            pub fn set(&mut self, field: $field, value: String) {
                match field {
                    $( $field::$variant => self.$member = value, )+
                }
            }
        }
    };
}

pub(crate) use text_record;
