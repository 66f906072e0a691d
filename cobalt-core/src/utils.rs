use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::CoreError;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, CoreError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// A file writer that compresses when the path ends in `.gz`.
pub enum DynamicWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl DynamicWriter {
    ///
    /// Flush buffers and, for gzip output, write the trailer.
    ///
    pub fn finish(self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(mut w) => w.flush(),
            DynamicWriter::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for DynamicWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DynamicWriter::Plain(w) => w.write(buf),
            DynamicWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(w) => w.flush(),
            DynamicWriter::Gzip(w) => w.flush(),
        }
    }
}

///
/// Get a writer for either a gzip'd or non-gzip'd file, creating parent
/// directories as needed.
///
/// # Arguments
///
/// - path: path to the file to write
///
pub fn get_dynamic_writer(path: &Path) -> Result<DynamicWriter, CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = BufWriter::new(File::create(path)?);
    let writer = if path.extension() == Some(OsStr::new("gz")) {
        DynamicWriter::Gzip(GzEncoder::new(file, Compression::default()))
    } else {
        DynamicWriter::Plain(file)
    };

    Ok(writer)
}

///
/// Tab-separated reader with a header row over a possibly gzip'd file.
///
pub fn tsv_reader(path: &Path) -> Result<csv::Reader<BufReader<Box<dyn Read>>>, CoreError> {
    let reader = get_dynamic_reader(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .from_reader(reader))
}

///
/// Tab-separated writer over a possibly gzip'd file.
///
pub fn tsv_writer(path: &Path) -> Result<csv::Writer<DynamicWriter>, CoreError> {
    let writer = get_dynamic_writer(path)?;
    Ok(csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer))
}

///
/// Flush a tsv writer and release the underlying file.
///
pub fn finish_tsv(writer: csv::Writer<DynamicWriter>) -> Result<(), CoreError> {
    let inner = writer.into_inner().map_err(|e| e.into_error())?;
    inner.finish()?;
    Ok(())
}

/// Parses a BED line into (chromosome, start, end), ignoring further columns.
pub fn parse_bedlike_line(line: &str) -> Option<(String, i64, i64)> {
    let mut fields = line.split('\t');
    let ctg = fields.next()?;
    let st = fields.next()?.trim().parse::<i64>().ok()?;
    let en = fields.next()?.trim().parse::<i64>().ok()?;

    Some((ctg.to_string(), st, en))
}
