pub mod response;
pub mod timecode;
pub mod transient;
pub mod upload;
