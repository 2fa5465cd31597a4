// src/audio/sample_player.rs

use crate::audio::{NotePlayer, PlayRequest, Playback, PlaybackError, SampleLocation, SampleSource};
use crate::config::AudioConfig;
use crate::piano::Volume;
use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use std::thread;
use std::time::Duration;

/// Plays pre-recorded note samples.
///
/// Every request gets its own worker thread that fetches the sample, decodes
/// it and hands it to a detached sink, so overlapping notes simply mix in the
/// output device.
pub struct SamplePlayer {
    source: SampleSource,
    client: Client,
    output: Option<OutputStreamHandle>,
    /// Must outlive every sink; dropping it silences the device
    _stream: Option<OutputStream>,
}

impl SamplePlayer {
    /// Open the default output device and build the HTTP client.
    ///
    /// A missing output device is not fatal: every later request fails and
    /// is logged instead.
    pub fn new(config: &AudioConfig) -> Result<Self, PlaybackError> {
        let source = SampleSource::new(&config.sample_base, &config.sample_extension);
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(PlaybackError::Client)?;

        let (stream, output) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(e) => {
                log::warn!("Audio output unavailable, notes will be silent: {}", e);
                (None, None)
            }
        };

        log::info!(
            "Sample player ready ({} samples from {})",
            if source.is_remote() { "remote" } else { "local" },
            config.sample_base
        );

        Ok(SamplePlayer {
            source,
            client,
            output,
            _stream: stream,
        })
    }
}

impl NotePlayer for SamplePlayer {
    fn play(&self, request: PlayRequest) -> Playback {
        let playback = Playback::pending();

        let Some(output) = self.output.clone() else {
            playback.fail(PlaybackError::NoOutputDevice);
            return playback;
        };

        let location = self.source.locate(&request.note);
        let client = self.client.clone();
        let worker_playback = playback.clone();

        let spawned = thread::Builder::new()
            .name(format!("play-{}", request.note))
            .spawn(move || {
                let result = load_sample(&client, &location)
                    .and_then(|bytes| start_sink(&output, bytes, &request.note, request.volume));
                match result {
                    Ok(()) => {
                        log::debug!("Playing {} at volume {:.1}", location, request.volume.get());
                        worker_playback.mark_started();
                    }
                    Err(e) => worker_playback.fail(e),
                }
            });

        if let Err(e) = spawned {
            playback.fail(PlaybackError::Spawn(e));
        }

        playback
    }
}

fn load_sample(client: &Client, location: &SampleLocation) -> Result<Vec<u8>, PlaybackError> {
    match location {
        SampleLocation::Url(url) => {
            let fetch_error = |source: reqwest::Error| PlaybackError::Fetch {
                location: url.clone(),
                source,
            };
            let response = client.get(url).send().map_err(fetch_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(PlaybackError::Status {
                    location: url.clone(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().map_err(fetch_error)?;
            Ok(bytes.to_vec())
        }
        SampleLocation::File(path) => std::fs::read(path).map_err(|source| PlaybackError::Io {
            location: path.display().to_string(),
            source,
        }),
    }
}

fn start_sink(
    output: &OutputStreamHandle,
    bytes: Vec<u8>,
    note: &str,
    volume: Volume,
) -> Result<(), PlaybackError> {
    let decoded = Decoder::new(Cursor::new(bytes)).map_err(|source| PlaybackError::Decode {
        note: note.to_string(),
        source,
    })?;
    let sink = Sink::try_new(output)?;
    sink.set_volume(volume.get());
    sink.append(decoded);
    sink.detach();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PlaybackState;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve a single request with `response` on a local port
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_play_without_output_device_fails() {
        let player = SamplePlayer {
            source: SampleSource::new("https://example.com/samples", "mp3"),
            client: Client::new(),
            output: None,
            _stream: None,
        };

        let playback = player.play(PlayRequest::new("C", Volume::default()));
        assert!(playback.is_failed());
        match playback.state() {
            PlaybackState::Failed(msg) => assert!(msg.contains("output device")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_http_error_status_is_reported() {
        let base = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let source = SampleSource::new(&base, "mp3");
        let client = Client::new();

        let err = load_sample(&client, &source.locate("C#")).unwrap_err();
        match err {
            PlaybackError::Status { location, status } => {
                assert_eq!(status, 404);
                assert!(location.ends_with("/C%23.mp3"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_http_body_is_returned() {
        let base = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 4\r\nConnection: close\r\n\r\nRIFF");
        let source = SampleSource::new(&base, "wav");
        let client = Client::new();

        let bytes = load_sample(&client, &source.locate("A")).unwrap();
        assert_eq!(bytes, b"RIFF");
    }

    #[test]
    fn test_unreachable_host_reports_fetch_error() {
        // Bind then drop to get a port nothing listens on
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let source = SampleSource::new(&format!("http://{}", addr), "mp3");
        let client = Client::new();

        let err = load_sample(&client, &source.locate("D")).unwrap_err();
        assert!(matches!(err, PlaybackError::Fetch { .. }));
        assert!(err.to_string().contains("D.mp3"));
    }

    #[test]
    fn test_missing_local_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = SampleSource::new(dir.path().to_str().unwrap(), "mp3");
        let client = Client::new();

        let err = load_sample(&client, &source.locate("C")).unwrap_err();
        assert!(matches!(err, PlaybackError::Io { .. }));
        assert!(err.to_string().contains("C.mp3"));
    }

    #[test]
    fn test_local_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("G#.wav"), b"RIFF").unwrap();
        let source = SampleSource::new(dir.path().to_str().unwrap(), "wav");
        let client = Client::new();

        let bytes = load_sample(&client, &source.locate("G#")).unwrap();
        assert_eq!(bytes, b"RIFF");
    }
}
