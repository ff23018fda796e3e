pub mod retry;
pub mod transport;
pub mod vision;

pub use retry::{RetryLayer, RetryPolicy};
pub use transport::{HttpTransport, TransportResponse, VisionTransport};
pub use vision::{VisionClient, VisionService};
