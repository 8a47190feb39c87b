use std::io;
use std::sync::{Arc, Mutex};

use skyshell_config::{CliArgs, Config};
use skyshell_viewer::start;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// One test per binary: the subscriber is process-global.
#[test]
fn test_startup_logs_config_events() {
    let dir = tempfile::tempdir().unwrap();
    let args = CliArgs {
        config: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let buffer = SharedBuffer::default();
    let console = buffer.clone();

    let startup = start(&args, move || console.clone(), false).unwrap();
    assert_eq!(startup.config, Config::default());
    assert!(dir.path().join("config.ron").exists());

    let output = buffer.contents();
    assert!(
        output.contains("Created default config"),
        "config event missing from log output:\n{output}"
    );
    assert!(output.contains("skyshell viewer starting"));

    if std::env::var_os("RUST_LOG").is_none() {
        tracing::debug!("filtered before reload");
        let mut verbose = startup.config.clone();
        verbose.debug.log_level = "debug".to_string();
        assert!(startup.log.apply_config(&verbose));
        tracing::debug!("visible after reload");

        let output = buffer.contents();
        assert!(!output.contains("filtered before reload"));
        assert!(output.contains("visible after reload"));
    }
}
