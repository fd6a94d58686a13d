//! Runs against a real ffprobe. The media-dependent cases are ignored by
//! default; run them with `cargo test -- --ignored` after pointing
//! `MEDIA_PROBE_TEST_FILE` at a 10 second 1080p H.264/AAC mp4 and
//! `MEDIA_PROBE_TEST_RTSP` at a live source with one video and one audio stream.

use media_probe::{probe, ExecError, ProbeError};

fn env_target(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{} is not set", name))
}

#[test]
fn test_missing_target_is_invocation_error() {
    let err = probe("/nonexistent/media-probe/missing.mp4").unwrap_err();

    match &err {
        ProbeError::Invocation { source, stderr } => {
            // Either ffprobe ran and complained, or it is not installed.
            match source {
                ExecError::Spawn(_) => assert!(stderr.is_empty()),
                _ => assert!(!stderr.trim().is_empty()),
            }
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!err.to_string().is_empty());
}

#[test]
#[ignore]
fn test_local_file() {
    let result = probe(&env_target("MEDIA_PROBE_TEST_FILE")).unwrap();

    assert_eq!(result.format.format_name, "mov,mp4,m4a,3gp,3g2,mj2");
    assert_eq!(result.format.duration, 10.0);

    let videos = result.streams_by_type("video").unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].codec_name, "h264");
    assert_eq!(videos[0].codec_type, "video");
    assert_eq!(videos[0].width, Some(1920));
    assert_eq!(videos[0].height, Some(1080));
}

#[test]
#[ignore]
fn test_rtsp_source() {
    let result = probe(&env_target("MEDIA_PROBE_TEST_RTSP")).unwrap();

    assert_eq!(result.format.format_name, "rtsp");
    assert_eq!(result.format.stream_count, 2);
    assert_eq!(result.format.duration, 0.0);
    assert_eq!(result.streams_by_type("video").unwrap().len(), 1);
    assert_eq!(result.streams_by_type("audio").unwrap().len(), 1);
}
