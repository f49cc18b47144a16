pub mod camera;
pub mod frame;
pub mod source;

pub use camera::{CameraClient, CapturedImage, FrameProducer, TestPatternCamera};
pub use frame::Frame;
pub use source::{latest_channel, FrameReceiver, FrameSender};
