pub mod brief;
pub mod character;
pub mod errors;
pub(crate) mod fields;
pub mod form;
pub mod ids;
pub mod plot_tools;
pub mod profile;
pub mod sections;
pub mod tasks;
pub mod utils;

pub use errors::BookgenError;
pub use fields::InputKind;
pub use form::{
    FormAction,
    StoryForm,
};
