use std::io::Write;

/// The process environment the harvest runs in, so tests can capture console output.
pub trait Host {
    /// Where phase banners and the final summary go (e.g. stdout)
    fn output(&mut self) -> impl Write;

    /// Where fatal and per-entry failure messages go (e.g. stderr)
    fn error(&mut self) -> impl Write;
}

/// Host that captures everything in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
}

#[cfg(test)]
impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_text(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }
}
