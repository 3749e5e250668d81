use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};

/// Reads one line without its terminator. `None` at end of input.
pub async fn read_line(reader: &mut (impl AsyncBufRead + Unpin), buffer: &mut String) -> io::Result<Option<String>> {
    buffer.clear();
    if reader.read_line(buffer).await? == 0 {
        return Ok(None);
    }

    let line = buffer.trim_end_matches(['\n', '\r']);
    Ok(Some(line.to_owned()))
}
