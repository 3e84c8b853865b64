//! HTTP protocol layer module
//!
//! MIME table and response builders, decoupled from the handler logic.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_400_response, build_404_response, build_405_response, build_500_response,
    build_file_response, build_html_response, build_redirect_response,
};
