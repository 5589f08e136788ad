use crate::core::error::Result;
use flate2::read::MultiGzDecoder;
use memchr::memchr;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled == magic.len() && magic == GZIP_MAGIC {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

/// Forward-only, single-pass source of input lines. Plain files are
/// memory-mapped and scanned with memchr; gzipped files are streamed.
pub enum LineSource {
    Mapped {
        map: Mmap,
        pos: usize,
    },
    Streamed {
        reader: Box<dyn BufRead>,
        buf: Vec<u8>,
    },
}

impl LineSource {
    pub fn open(path: &Path) -> Result<LineSource> {
        let kind = detect_input_kind(path)?;
        let mut file = File::open(path)?;
        match kind {
            InputKind::Gzip => {
                file.seek(SeekFrom::Start(0))?;
                Ok(LineSource::Streamed {
                    reader: Box::new(BufReader::new(MultiGzDecoder::new(file))),
                    buf: Vec::new(),
                })
            }
            InputKind::Plain => {
                if file.metadata()?.len() == 0 {
                    // mmap of a zero-length file is platform-dependent
                    return Ok(LineSource::Streamed {
                        reader: Box::new(BufReader::new(file)),
                        buf: Vec::new(),
                    });
                }
                // SAFETY: read-only file mapping.
                let map = unsafe { Mmap::map(&file) }?;
                Ok(LineSource::Mapped { map, pos: 0 })
            }
        }
    }

    pub fn from_reader(reader: Box<dyn BufRead>) -> LineSource {
        LineSource::Streamed {
            reader,
            buf: Vec::new(),
        }
    }

    /// Next line without its terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        match self {
            LineSource::Mapped { map, pos } => {
                if *pos >= map.len() {
                    return Ok(None);
                }
                let rest = &map[*pos..];
                let (end, advance) = match memchr(b'\n', rest) {
                    Some(i) => (i, i + 1),
                    None => (rest.len(), rest.len()),
                };
                *pos += advance;
                Ok(Some(trim_cr(&rest[..end])))
            }
            LineSource::Streamed { reader, buf } => {
                buf.clear();
                let n = reader.read_until(b'\n', buf)?;
                if n == 0 {
                    return Ok(None);
                }
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                Ok(Some(buf.as_slice()))
            }
        }
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}
