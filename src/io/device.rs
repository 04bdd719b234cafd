use std::sync::Arc;

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};

use crate::{
    engine::mixer::{lock, CallbackRenderer, SharedMixer},
    error::EngineError,
    io::{Backend, OutputStream},
    MAX_BLOCK_SIZE,
};

/// Opens the host's default output device at its default configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

impl CpalBackend {
    pub fn new() -> Self {
        Self
    }
}

struct CpalStream {
    stream: cpal::Stream,
    sample_rate: f32,
}

impl OutputStream for CpalStream {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn resume(&self) -> Result<(), EngineError> {
        self.stream
            .play()
            .map_err(|e| EngineError::Unavailable(format!("failed to resume audio stream: {e}")))
    }
}

impl Backend for CpalBackend {
    fn open(&mut self, mixer: SharedMixer) -> Result<Box<dyn OutputStream>, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::Unavailable("no default output device available".into()))?;
        let config = device.default_output_config().map_err(|e| {
            EngineError::Unavailable(format!("failed to fetch default output config: {e}"))
        })?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let stream_config = config.config();
        lock(&mixer).set_sample_rate(sample_rate);

        let mut renderer = CallbackRenderer::new(Arc::clone(&mixer));
        let stream = match config.sample_format() {
            SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    renderer.fill(data, channels);
                },
                |err| tracing::error!("audio stream error: {err}"),
                None,
            ),
            SampleFormat::I16 => {
                let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE * channels];
                device.build_output_stream(
                    &stream_config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        if render_buf.len() < data.len() {
                            render_buf.resize(data.len(), 0.0);
                        }
                        let block = &mut render_buf[..data.len()];
                        renderer.fill(block, channels);
                        for (out, &sample) in data.iter_mut().zip(block.iter()) {
                            *out = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                        }
                    },
                    |err| tracing::error!("audio stream error: {err}"),
                    None,
                )
            }
            other => {
                return Err(EngineError::Unavailable(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        }
        .map_err(|e| EngineError::Unavailable(format!("failed to build audio stream: {e}")))?;

        stream
            .play()
            .map_err(|e| EngineError::Unavailable(format!("failed to play audio stream: {e}")))?;

        tracing::info!(sample_rate, channels, "audio output opened");

        Ok(Box::new(CpalStream {
            stream,
            sample_rate,
        }))
    }
}
