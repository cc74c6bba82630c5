//! Database entities

pub mod captured_request;

pub use captured_request::Entity as CapturedRequest;

pub mod prelude {
    pub use super::captured_request::Entity as CapturedRequest;
}
