use std::io::{self, Write};

/// Writes `text` as-is. A closed pipe (`runway forecast | head`) is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_parts(&[text.as_bytes()])
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_parts(&[text.as_bytes(), b"\n"])
}

fn write_parts(parts: &[&[u8]]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for part in parts {
        tolerate_broken_pipe(stdout.write_all(part))?;
    }
    tolerate_broken_pipe(stdout.flush())
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
