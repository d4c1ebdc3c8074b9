//! Upload lifecycle: validate a file, derive its preview, send it to the
//! extraction service and hand the resulting palette to the model.

pub mod extract;
pub mod preview;
pub mod upload;
pub mod validate;
