#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod preprocess;
pub mod resample;
pub mod wav;

#[cfg(feature = "audio-io")]
pub use input::MicCapture;
#[cfg(feature = "audio-io")]
pub use output::SpeakerOutput;
pub use preprocess::prepare_for_transcription;
pub use resample::{resample_to, AudioResampler};
pub use wav::{read_wav, write_wav};
