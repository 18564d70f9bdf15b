//! Cross-platform microphone capture using cpal
//!
//! Speech-optimized settings: 16kHz mono, resampled from the device rate when
//! needed. Chunks are flushed to the sink every 100ms and framed as a
//! streaming WAV: the first chunk starts with the container header, later
//! chunks are raw PCM frames, so the concatenation of all chunks is one
//! playable audio/wav body.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::time::{sleep, Duration as TokioDuration};

use crate::application::ports::{AudioCapture, CaptureError, ChunkSink};
use crate::domain::voice::AudioFormat;

/// Sample rate of the uploaded recording
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Chunk flush interval
pub const CHUNK_INTERVAL_MS: u64 = 100;

/// Microphone capture adapter.
///
/// The device is probed at construction: a missing or unopenable input device
/// fails `open()` with `DeviceUnavailable` so no half-usable capture exists.
/// The cpal stream itself lives on a dedicated thread (cpal::Stream is not
/// Send) that the flags below coordinate with.
pub struct CpalCapture {
    /// Mono samples at device rate, accumulated between chunk flushes
    pending: Arc<StdMutex<Vec<i16>>>,
    /// Capture in progress
    is_active: Arc<AtomicBool>,
    /// Capture thread still running (cleared after the final flush)
    thread_running: Arc<AtomicBool>,
    /// Device released; further starts are refused
    closed: AtomicBool,
    /// Last error reported by the capture thread
    last_error: Arc<StdMutex<Option<String>>>,
}

impl CpalCapture {
    /// Acquire the default input device.
    ///
    /// Fails with `DeviceUnavailable` when no microphone can be opened, so
    /// callers can show a permission-specific message.
    pub fn open() -> Result<Self, CaptureError> {
        let device = Self::get_input_device()?;
        Self::get_input_config(&device)
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        Ok(Self {
            pending: Arc::new(StdMutex::new(Vec::new())),
            is_active: Arc::new(AtomicBool::new(false)),
            thread_running: Arc::new(AtomicBool::new(false)),
            closed: AtomicBool::new(false),
            last_error: Arc::new(StdMutex::new(None)),
        })
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no input device found".to_string()))
    }

    /// Get a suitable input configuration
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono and configs that include the 16kHz target rate
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or_else(|| {
            CaptureError::StartFailed("No suitable input config found".to_string())
        })?;

        let sample_rate = if config_range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix stereo to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Wait for the capture thread to finish its final flush
    async fn wait_for_thread(&self) {
        while self.thread_running.load(Ordering::SeqCst) {
            sleep(TokioDuration::from_millis(10)).await;
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for CpalCapture {
    async fn start(&self, sink: ChunkSink) -> Result<(), CaptureError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CaptureError::DeviceUnavailable(
                "capture device has been released".to_string(),
            ));
        }
        if self.is_active.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "capture already in progress".to_string(),
            ));
        }

        self.pending.lock().unwrap().clear();
        *self.last_error.lock().unwrap() = None;
        self.is_active.store(true, Ordering::SeqCst);
        self.thread_running.store(true, Ordering::SeqCst);

        let pending = Arc::clone(&self.pending);
        let is_active = Arc::clone(&self.is_active);
        let thread_running = Arc::clone(&self.thread_running);
        let last_error = Arc::clone(&self.last_error);

        // Dedicated thread: cpal::Stream is not Send
        std::thread::spawn(move || {
            let result = run_capture_thread(&pending, &is_active, sink);
            if let Err(e) = result {
                *last_error.lock().unwrap() = Some(e.to_string());
                is_active.store(false, Ordering::SeqCst);
            }
            thread_running.store(false, Ordering::SeqCst);
        });

        // Give the thread a moment to open the stream
        sleep(TokioDuration::from_millis(50)).await;

        if !self.is_active.load(Ordering::SeqCst) {
            let message = self
                .last_error
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| "Failed to start capture".to_string());
            return Err(CaptureError::StartFailed(message));
        }

        Ok(())
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        self.is_active.store(false, Ordering::SeqCst);
        self.wait_for_thread().await;

        // A thread that died mid-capture already cleared is_active; its
        // error still has to reach the caller.
        if let Some(message) = self.last_error.lock().unwrap().take() {
            return Err(CaptureError::StreamFailed(message));
        }

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn close(&self) -> Result<(), CaptureError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.is_active.load(Ordering::SeqCst) {
            self.is_active.store(false, Ordering::SeqCst);
            self.wait_for_thread().await;
        }
        Ok(())
    }
}

/// Body of the capture thread: open the stream, flush chunks on the interval
/// until deactivated, then flush the remainder.
fn run_capture_thread(
    pending: &Arc<StdMutex<Vec<i16>>>,
    is_active: &Arc<AtomicBool>,
    sink: ChunkSink,
) -> Result<(), CaptureError> {
    let device = CpalCapture::get_input_device()?;
    let (config, sample_format) = CpalCapture::get_input_config(&device)?;
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    let pending_clone = Arc::clone(pending);
    let active_clone = Arc::clone(is_active);

    let stream = match sample_format {
        SampleFormat::I16 => device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if active_clone.load(Ordering::SeqCst) {
                        let mono = CpalCapture::stereo_to_mono(data, channels);
                        if let Ok(mut buffer) = pending_clone.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?,

        SampleFormat::F32 => device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if active_clone.load(Ordering::SeqCst) {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        let mono = CpalCapture::stereo_to_mono(&i16_data, channels);
                        if let Ok(mut buffer) = pending_clone.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?,

        _ => {
            return Err(CaptureError::StartFailed(
                "Unsupported sample format".to_string(),
            ))
        }
    };

    stream
        .play()
        .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

    let mut resampler = StreamResampler::new(sample_rate)
        .map_err(|e| CaptureError::StartFailed(format!("Resampler init failed: {}", e)))?;
    let mut header_sent = false;

    while is_active.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(CHUNK_INTERVAL_MS));

        let samples = {
            let mut buffer = pending.lock().unwrap();
            std::mem::take(&mut *buffer)
        };
        flush_chunk(&sink, resampler.push(&samples), &mut header_sent);
    }

    // Final flush: whatever arrived since the last tick, plus the tail still
    // buffered inside the resampler.
    let samples = {
        let mut buffer = pending.lock().unwrap();
        std::mem::take(&mut *buffer)
    };
    let mut tail = resampler.push(&samples);
    tail.extend(resampler.finish());
    flush_chunk(&sink, tail, &mut header_sent);

    drop(stream);
    Ok(())
}

/// Deliver one chunk to the sink. The WAV header goes out with the first
/// non-empty flush, so a capture that produced no audio delivers no chunks.
fn flush_chunk(sink: &ChunkSink, samples: Vec<i16>, header_sent: &mut bool) {
    if samples.is_empty() {
        return;
    }

    let frames = samples_to_bytes(&samples);
    if *header_sent {
        sink(frames);
    } else {
        let mut chunk = stream_wav_header(TARGET_SAMPLE_RATE, 1).to_vec();
        chunk.extend_from_slice(&frames);
        sink(chunk);
        *header_sent = true;
    }
}

/// Streaming resampler from the device rate down to 16kHz mono.
///
/// Wraps rubato's fixed-input FFT resampler with a carry buffer so it can be
/// fed the uneven sample counts a 100ms tick produces.
struct StreamResampler {
    inner: Option<FftFixedIn<f32>>,
    carry: Vec<f32>,
}

impl StreamResampler {
    fn new(source_rate: u32) -> Result<Self, rubato::ResamplerConstructionError> {
        let inner = if source_rate == TARGET_SAMPLE_RATE {
            None
        } else {
            Some(FftFixedIn::<f32>::new(
                source_rate as usize,
                TARGET_SAMPLE_RATE as usize,
                1024, // Chunk size
                2,    // Sub-chunks
                1,    // Mono
            )?)
        };

        Ok(Self {
            inner,
            carry: Vec::new(),
        })
    }

    /// Feed device-rate samples, returning all 16kHz output that became ready
    fn push(&mut self, samples: &[i16]) -> Vec<i16> {
        let Some(resampler) = self.inner.as_mut() else {
            return samples.to_vec();
        };

        self.carry
            .extend(samples.iter().map(|&s| s as f32 / 32768.0));

        let mut output = Vec::new();
        loop {
            let frames_needed = resampler.input_frames_next();
            if self.carry.len() < frames_needed {
                break;
            }

            let block: Vec<f32> = self.carry.drain(..frames_needed).collect();
            match resampler.process(&[block], None) {
                Ok(resampled) => {
                    output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
                }
                Err(e) => {
                    eprintln!("Resampling failed: {}", e);
                    break;
                }
            }
        }

        output
    }

    /// Drain the remaining partial block, zero-padded to a full one
    fn finish(&mut self) -> Vec<i16> {
        let Some(resampler) = self.inner.as_mut() else {
            return Vec::new();
        };
        if self.carry.is_empty() {
            return Vec::new();
        }

        let frames_needed = resampler.input_frames_next();
        let mut block: Vec<f32> = self.carry.drain(..).collect();
        let real_len = block.len();
        block.resize(frames_needed, 0.0);

        match resampler.process(&[block], None) {
            Ok(resampled) => {
                // Trim the zero-padding back out of the output
                let ratio = real_len as f64 / frames_needed as f64;
                let keep = (resampled[0].len() as f64 * ratio).ceil() as usize;
                resampled[0]
                    .iter()
                    .take(keep)
                    .map(|&s| (s * 32767.0) as i16)
                    .collect()
            }
            Err(e) => {
                eprintln!("Resampling failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Convert i16 samples to little-endian PCM bytes
fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Build a 44-byte WAV header for a stream of unknown length.
///
/// Both size fields are set to 0xFFFFFFFF, the conventional marker for
/// streamed WAV where the final length is not known up front.
fn stream_wav_header(sample_rate: u32, channels: u16) -> [u8; 44] {
    let byte_rate = sample_rate * channels as u32 * 2;
    let block_align = channels * 2;

    let mut header = [0u8; 44];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&16u16.to_le_bytes()); // bits per sample
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&u32::MAX.to_le_bytes());
    header
}
