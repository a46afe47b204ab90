//! Forward-only reading of ZIP local file entries.
//!
//! Entries are read in stream order from their local headers; the central
//! directory is never consulted. An entry's sizes come from its local header,
//! from a ZIP64 extra field, or from a data descriptor written after the data
//! (general purpose flag bit 3), which is what streaming ZIP writers produce.
//!
//! Deflated entries with a data descriptor end where their deflate stream
//! ends. Stored entries with a data descriptor end at the first signed
//! descriptor whose CRC-32 and sizes match the bytes before it.

use crate::error::{Error, Result};
use crc32fast::Hasher;
use flate2::bufread::DeflateDecoder;
use std::io::{self, BufRead, Read, Take};

const LOCAL_FILE_HEADER: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR: u32 = 0x0807_4b50;
const LOCAL_HEADER_LEN: usize = 30;

const FLAG_ENCRYPTED: u16 = 0x0001;
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;

const ZIP64_EXTRA_FIELD: u16 = 0x0001;
const ZIP64_MARKER: u32 = 0xFFFF_FFFF;

/// Longest data descriptor: signature, CRC-32 and two 8-byte sizes.
const MAX_DESCRIPTOR_LEN: usize = 24;

const BUFFER_SIZE: usize = 8 * 1024;

fn le_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(word)
}

/// Buffered reader that can look a few bytes past its position without
/// consuming them.
pub(crate) struct Lookahead<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
}

impl<R: Read> Lookahead<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; BUFFER_SIZE],
            pos: 0,
            filled: 0,
        }
    }

    /// Up to `n` bytes from the current position. Fewer only at end of input.
    fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        if self.filled - self.pos < n {
            self.buf.copy_within(self.pos..self.filled, 0);
            self.filled -= self.pos;
            self.pos = 0;
            if self.buf.len() < n {
                self.buf.resize(n, 0);
            }
            while self.filled < n {
                match self.inner.read(&mut self.buf[self.filled..]) {
                    Ok(0) => break,
                    Ok(read) => self.filled += read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        let end = self.filled.min(self.pos + n);
        Ok(&self.buf[self.pos..end])
    }
}

impl<R: Read> BufRead for Lookahead<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos == self.filled {
            self.pos = 0;
            self.filled = 0;
            loop {
                match self.inner.read(&mut self.buf) {
                    Ok(read) => {
                        self.filled = read;
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }
}

impl<R: Read> Read for Lookahead<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

/// A local file header.
#[derive(Debug, Clone)]
pub(crate) struct LocalEntry {
    pub(crate) name: String,
    flags: u16,
    method: u16,
    crc32: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    zip64: bool,
}

impl LocalEntry {
    pub(crate) fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }

    fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    fn is_readable(&self) -> bool {
        !self.is_encrypted() && matches!(self.method, METHOD_STORED | METHOD_DEFLATED)
    }
}

/// Find the body of the ZIP64 extended information field.
fn zip64_extra(mut extra: &[u8]) -> Option<&[u8]> {
    while extra.len() >= 4 {
        let id = le_u16(extra);
        let len = le_u16(&extra[2..]) as usize;
        let body = extra.get(4..4 + len)?;
        if id == ZIP64_EXTRA_FIELD {
            return Some(body);
        }
        extra = &extra[4 + len..];
    }
    None
}

/// The entries of a ZIP stream, in stream order.
pub(crate) struct LocalEntries<R> {
    input: Lookahead<R>,
}

impl<R: Read> LocalEntries<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input: Lookahead::new(input),
        }
    }

    /// Read the next local file header.
    ///
    /// Returns `None` once the stream holds anything other than a complete
    /// local header: the central directory, the end of input, or data that is
    /// not a ZIP stream at all.
    pub(crate) fn next_entry(&mut self) -> Result<Option<LocalEntry>> {
        let mut fixed = [0u8; LOCAL_HEADER_LEN];
        {
            let head = self.input.peek(LOCAL_HEADER_LEN)?;
            if head.len() < LOCAL_HEADER_LEN || le_u32(head) != LOCAL_FILE_HEADER {
                return Ok(None);
            }
            fixed.copy_from_slice(head);
        }
        self.input.consume(LOCAL_HEADER_LEN);

        let compressed_size = le_u32(&fixed[18..]);
        let uncompressed_size = le_u32(&fixed[22..]);

        let mut name = vec![0u8; le_u16(&fixed[26..]) as usize];
        self.input.read_exact(&mut name)?;
        let mut extra = vec![0u8; le_u16(&fixed[28..]) as usize];
        self.input.read_exact(&mut extra)?;

        let zip64 = zip64_extra(&extra);
        let mut entry = LocalEntry {
            name: String::from_utf8_lossy(&name).into_owned(),
            flags: le_u16(&fixed[6..]),
            method: le_u16(&fixed[8..]),
            crc32: le_u32(&fixed[14..]),
            compressed_size: u64::from(compressed_size),
            uncompressed_size: u64::from(uncompressed_size),
            zip64: zip64.is_some(),
        };

        // The ZIP64 field lists only the sizes whose header slot is saturated.
        if let Some(mut fields) = zip64 {
            if uncompressed_size == ZIP64_MARKER && fields.len() >= 8 {
                entry.uncompressed_size = le_u64(fields);
                fields = &fields[8..];
            }
            if compressed_size == ZIP64_MARKER && fields.len() >= 8 {
                entry.compressed_size = le_u64(fields);
            }
        }

        Ok(Some(entry))
    }

    /// Open the decompressed data of the entry whose header was just read.
    ///
    /// The returned reader must be [finished](EntryData::finish) before the
    /// next header is read.
    pub(crate) fn data(&mut self, entry: &LocalEntry) -> Result<EntryData<'_, R>> {
        if entry.is_encrypted() {
            return Err(Error::ZipArchive(format!(
                "entry `{}` is encrypted",
                entry.name
            )));
        }

        let body = match (entry.method, entry.has_data_descriptor()) {
            (METHOD_STORED, false) => Body::Stored((&mut self.input).take(entry.compressed_size)),
            (METHOD_DEFLATED, false) => Body::Deflated(DeflateDecoder::new(
                (&mut self.input).take(entry.compressed_size),
            )),
            (METHOD_STORED, true) => Body::StoredToDescriptor(&mut self.input),
            (METHOD_DEFLATED, true) => Body::DeflatedToEnd(DeflateDecoder::new(&mut self.input)),
            (method, _) => {
                return Err(Error::ZipArchive(format!(
                    "entry `{}` uses unsupported compression method {}",
                    entry.name, method
                )))
            }
        };

        Ok(EntryData {
            body,
            name: entry.name.clone(),
            crc32: entry.crc32,
            uncompressed_size: entry.uncompressed_size,
            zip64: entry.zip64,
            hasher: Hasher::new(),
            size: 0,
            descriptor: None,
        })
    }

    /// Move past the entry whose header was just read.
    ///
    /// Readable entries are decompressed and checked. Others are skipped by
    /// their compressed size, which must then be known up front.
    pub(crate) fn skip(&mut self, entry: &LocalEntry) -> Result<()> {
        if entry.is_readable() {
            return self.data(entry)?.finish();
        }
        if entry.has_data_descriptor() {
            return Err(Error::ZipArchive(format!(
                "entry `{}` cannot be skipped: its size follows its data",
                entry.name
            )));
        }

        let skipped = io::copy(
            &mut (&mut self.input).take(entry.compressed_size),
            &mut io::sink(),
        )?;
        if skipped < entry.compressed_size {
            return Err(truncated(&entry.name));
        }
        Ok(())
    }
}

fn truncated(name: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("ZIP entry `{}` is truncated", name),
    ))
}

enum Body<'a, R> {
    Stored(Take<&'a mut Lookahead<R>>),
    Deflated(DeflateDecoder<Take<&'a mut Lookahead<R>>>),
    StoredToDescriptor(&'a mut Lookahead<R>),
    DeflatedToEnd(DeflateDecoder<&'a mut Lookahead<R>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DescriptorLayout {
    Classic,
    Zip64,
}

/// Decompressed data of one entry, with its CRC-32 computed on the way.
pub(crate) struct EntryData<'a, R> {
    body: Body<'a, R>,
    name: String,
    crc32: u32,
    uncompressed_size: u64,
    zip64: bool,
    hasher: Hasher,
    size: u64,
    descriptor: Option<DescriptorLayout>,
}

impl<R: Read> Read for EntryData<'_, R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = match &mut self.body {
            Body::Stored(reader) => reader.read(out)?,
            Body::Deflated(reader) => reader.read(out)?,
            Body::DeflatedToEnd(reader) => reader.read(out)?,
            Body::StoredToDescriptor(input) => {
                read_to_descriptor(&mut **input, out, &self.hasher, self.size, &mut self.descriptor)?
            }
        };
        self.hasher.update(&out[..n]);
        self.size += n as u64;
        Ok(n)
    }
}

impl<R: Read> EntryData<'_, R> {
    /// Read what is left of the entry and its data descriptor, then check the
    /// CRC-32 and size of everything read.
    pub(crate) fn finish(mut self) -> Result<()> {
        io::copy(&mut self, &mut io::sink())?;

        let (crc32, size) = match self.body {
            Body::Stored(rest) => {
                if rest.limit() > 0 {
                    return Err(truncated(&self.name));
                }
                (self.crc32, self.uncompressed_size)
            }
            Body::Deflated(decoder) => {
                io::copy(&mut decoder.into_inner(), &mut io::sink())?;
                (self.crc32, self.uncompressed_size)
            }
            Body::DeflatedToEnd(decoder) => read_descriptor(decoder.into_inner(), self.zip64)?,
            Body::StoredToDescriptor(input) => {
                read_descriptor(input, self.descriptor == Some(DescriptorLayout::Zip64))?
            }
        };

        if self.hasher.finalize() != crc32 || self.size != size {
            return Err(Error::ZipArchive(format!(
                "invalid checksum for entry `{}`",
                self.name
            )));
        }
        Ok(())
    }
}

/// Read a data descriptor, with or without its signature.
fn read_descriptor<R: Read>(input: &mut Lookahead<R>, zip64: bool) -> Result<(u32, u64)> {
    let mut word = [0u8; 4];
    input.read_exact(&mut word)?;
    let mut crc32 = u32::from_le_bytes(word);
    if crc32 == DATA_DESCRIPTOR {
        input.read_exact(&mut word)?;
        crc32 = u32::from_le_bytes(word);
    }

    let size = if zip64 {
        let mut sizes = [0u8; 16];
        input.read_exact(&mut sizes)?;
        le_u64(&sizes[8..])
    } else {
        let mut sizes = [0u8; 8];
        input.read_exact(&mut sizes)?;
        u64::from(le_u32(&sizes[4..]))
    };
    Ok((crc32, size))
}

/// Copy stored bytes up to the data descriptor that closes them.
fn read_to_descriptor<R: Read>(
    input: &mut Lookahead<R>,
    out: &mut [u8],
    hasher: &Hasher,
    size: u64,
    found: &mut Option<DescriptorLayout>,
) -> io::Result<usize> {
    if found.is_some() || out.is_empty() {
        return Ok(0);
    }

    let first = DATA_DESCRIPTOR.to_le_bytes()[0];
    let candidate = {
        let available = input.fill_buf()?;
        if available.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stored ZIP entry ended before its data descriptor",
            ));
        }
        available.iter().position(|&b| b == first)
    };

    let run = match candidate {
        Some(0) => {
            if let Some(layout) = descriptor_at(input, hasher, size)? {
                *found = Some(layout);
                return Ok(0);
            }
            1
        }
        Some(offset) => offset,
        None => usize::MAX,
    };

    let available = input.fill_buf()?;
    let n = run.min(available.len()).min(out.len());
    out[..n].copy_from_slice(&available[..n]);
    input.consume(n);
    Ok(n)
}

/// Check whether a signed descriptor for the bytes read so far starts here.
fn descriptor_at<R: Read>(
    input: &mut Lookahead<R>,
    hasher: &Hasher,
    size: u64,
) -> io::Result<Option<DescriptorLayout>> {
    let head = input.peek(MAX_DESCRIPTOR_LEN)?;
    if head.len() < 16
        || le_u32(head) != DATA_DESCRIPTOR
        || le_u32(&head[4..]) != hasher.clone().finalize()
    {
        return Ok(None);
    }
    if u64::from(le_u32(&head[8..])) == size && u64::from(le_u32(&head[12..])) == size {
        return Ok(Some(DescriptorLayout::Classic));
    }
    if head.len() >= MAX_DESCRIPTOR_LEN && le_u64(&head[8..]) == size && le_u64(&head[16..]) == size
    {
        return Ok(Some(DescriptorLayout::Zip64));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sizes {
        Header,
        Descriptor,
        UnsignedDescriptor,
        Zip64Header,
        Zip64Descriptor,
    }

    fn local_entry(name: &str, data: &[u8], method: u16, sizes: Sizes) -> Vec<u8> {
        let body = if method == METHOD_DEFLATED {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        } else {
            data.to_vec()
        };
        let crc = crc32fast::hash(data);
        let in_descriptor = matches!(
            sizes,
            Sizes::Descriptor | Sizes::UnsignedDescriptor | Sizes::Zip64Descriptor
        );
        let zip64 = matches!(sizes, Sizes::Zip64Header | Sizes::Zip64Descriptor);
        let flags = if in_descriptor { FLAG_DATA_DESCRIPTOR } else { 0 };

        let mut extra = Vec::new();
        if zip64 {
            let (uncompressed, compressed) = if in_descriptor {
                (0u64, 0u64)
            } else {
                (data.len() as u64, body.len() as u64)
            };
            extra.extend_from_slice(&ZIP64_EXTRA_FIELD.to_le_bytes());
            extra.extend_from_slice(&16u16.to_le_bytes());
            extra.extend_from_slice(&uncompressed.to_le_bytes());
            extra.extend_from_slice(&compressed.to_le_bytes());
        }

        let (header_crc, header_compressed, header_uncompressed) = match sizes {
            Sizes::Header => (crc, body.len() as u32, data.len() as u32),
            Sizes::Zip64Header => (crc, ZIP64_MARKER, ZIP64_MARKER),
            _ => (0, 0, 0),
        };

        let mut out = Vec::new();
        out.extend_from_slice(&LOCAL_FILE_HEADER.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&method.to_le_bytes());
        out.extend_from_slice(&[0, 0, 0x21, 0]);
        out.extend_from_slice(&header_crc.to_le_bytes());
        out.extend_from_slice(&header_compressed.to_le_bytes());
        out.extend_from_slice(&header_uncompressed.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&extra);
        out.extend_from_slice(&body);

        if matches!(sizes, Sizes::Descriptor | Sizes::Zip64Descriptor) {
            out.extend_from_slice(&DATA_DESCRIPTOR.to_le_bytes());
        }
        if in_descriptor {
            out.extend_from_slice(&crc.to_le_bytes());
            if zip64 {
                out.extend_from_slice(&(body.len() as u64).to_le_bytes());
                out.extend_from_slice(&(data.len() as u64).to_le_bytes());
            } else {
                out.extend_from_slice(&(body.len() as u32).to_le_bytes());
                out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            }
        }
        out
    }

    fn read_entries(data: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = LocalEntries::new(data);
        let mut read = Vec::new();
        while let Some(entry) = entries.next_entry()? {
            let mut reader = entries.data(&entry)?;
            let mut content = Vec::new();
            reader.read_to_end(&mut content)?;
            reader.finish()?;
            read.push((entry.name.clone(), content));
        }
        Ok(read)
    }

    fn entry(name: &str, content: &[u8]) -> (String, Vec<u8>) {
        (name.to_string(), content.to_vec())
    }

    #[test]
    fn test_sizes_in_header() {
        let mut data = local_entry("a.txt", b"stored text", METHOD_STORED, Sizes::Header);
        data.extend(local_entry("b.xml", b"<deflated/>", METHOD_DEFLATED, Sizes::Header));

        assert_eq!(
            read_entries(&data).unwrap(),
            vec![entry("a.txt", b"stored text"), entry("b.xml", b"<deflated/>")]
        );
    }

    #[test]
    fn test_deflated_entries_with_descriptors() {
        let mut data = local_entry("a.xml", b"<signed/>", METHOD_DEFLATED, Sizes::Descriptor);
        data.extend(local_entry(
            "b.xml",
            b"<unsigned/>",
            METHOD_DEFLATED,
            Sizes::UnsignedDescriptor,
        ));
        data.extend(local_entry("c.xml", b"<after/>", METHOD_DEFLATED, Sizes::Header));

        assert_eq!(
            read_entries(&data).unwrap(),
            vec![
                entry("a.xml", b"<signed/>"),
                entry("b.xml", b"<unsigned/>"),
                entry("c.xml", b"<after/>"),
            ]
        );
    }

    #[test]
    fn test_stored_entry_with_descriptor() {
        // A descriptor signature inside the data does not end the entry.
        let content = b"before PK\x07\x08 after";
        let mut data = local_entry("mimetype", content, METHOD_STORED, Sizes::Descriptor);
        data.extend(local_entry("empty", b"", METHOD_STORED, Sizes::Descriptor));
        data.extend(local_entry("next.xml", b"<next/>", METHOD_DEFLATED, Sizes::Descriptor));

        assert_eq!(
            read_entries(&data).unwrap(),
            vec![
                entry("mimetype", content),
                entry("empty", b""),
                entry("next.xml", b"<next/>"),
            ]
        );
    }

    #[test]
    fn test_zip64_sizes() {
        let mut data = local_entry("a.xml", b"<header/>", METHOD_DEFLATED, Sizes::Zip64Header);
        data.extend(local_entry(
            "b.xml",
            b"<descriptor/>",
            METHOD_DEFLATED,
            Sizes::Zip64Descriptor,
        ));
        data.extend(local_entry("c.txt", b"stored", METHOD_STORED, Sizes::Zip64Descriptor));

        assert_eq!(
            read_entries(&data).unwrap(),
            vec![
                entry("a.xml", b"<header/>"),
                entry("b.xml", b"<descriptor/>"),
                entry("c.txt", b"stored"),
            ]
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut data = local_entry("a.xml", b"<a/>", METHOD_DEFLATED, Sizes::Descriptor);
        let crc_at = data.len() - 12;
        data[crc_at] ^= 0xff;

        let err = read_entries(&data).unwrap_err();
        assert!(matches!(err, Error::ZipArchive(_)));
    }

    #[test]
    fn test_truncated_stored_entry() {
        let mut data = local_entry("a.txt", b"0123456789", METHOD_STORED, Sizes::Header);
        data.truncate(data.len() - 4);

        let err = read_entries(&data).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_non_zip_input_has_no_entries() {
        let mut entries = LocalEntries::new(&b"Test"[..]);
        assert!(entries.next_entry().unwrap().is_none());

        let mut entries = LocalEntries::new(&b""[..]);
        assert!(entries.next_entry().unwrap().is_none());

        let mut entries = LocalEntries::new(&b"PK\x01\x02 central directory"[..]);
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_unsupported_method() {
        let mut data = local_entry("packed", b"bzip2 data", 12, Sizes::Header);
        data.extend(local_entry("a.xml", b"<a/>", METHOD_DEFLATED, Sizes::Header));

        let mut entries = LocalEntries::new(&data[..]);
        let first = entries.next_entry().unwrap().unwrap();
        assert!(matches!(entries.data(&first), Err(Error::ZipArchive(_))));

        // Its size is known, so it can still be stepped over.
        entries.skip(&first).unwrap();
        let second = entries.next_entry().unwrap().unwrap();
        assert_eq!(second.name, "a.xml");
    }

    #[test]
    fn test_encrypted_entry() {
        let mut data = local_entry("a.xml", b"<a/>", METHOD_STORED, Sizes::Header);
        data[6] |= FLAG_ENCRYPTED as u8;

        let mut entries = LocalEntries::new(&data[..]);
        let entry = entries.next_entry().unwrap().unwrap();
        assert!(matches!(entries.data(&entry), Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_directory_entry() {
        let data = local_entry("META-INF/", b"", METHOD_STORED, Sizes::Header);

        let mut entries = LocalEntries::new(&data[..]);
        let entry = entries.next_entry().unwrap().unwrap();
        assert!(entry.is_dir());
    }

    #[test]
    fn test_content_located_in_streamed_archive() {
        let mut data = local_entry(
            "mimetype",
            b"application/vnd.oasis.opendocument.spreadsheet",
            METHOD_STORED,
            Sizes::Descriptor,
        );
        data.extend(local_entry("META-INF/", b"", METHOD_STORED, Sizes::Descriptor));
        data.extend(local_entry("content.xml", b"<body/>", METHOD_DEFLATED, Sizes::Descriptor));
        data.extend(local_entry("content.xml", b"<second/>", METHOD_DEFLATED, Sizes::Descriptor));

        let text = crate::container::with_content_stream(&data[..], |entry| {
            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            Ok(text)
        })
        .unwrap();
        assert_eq!(text, "<body/>");
    }

    #[test]
    fn test_lookahead_peek_across_reads() {
        // One byte per read call, so peeking has to gather.
        struct Trickle<'a>(&'a [u8]);

        impl Read for Trickle<'_> {
            fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
                if self.0.is_empty() || out.is_empty() {
                    return Ok(0);
                }
                out[0] = self.0[0];
                self.0 = &self.0[1..];
                Ok(1)
            }
        }

        let mut input = Lookahead::new(Trickle(b"abcdef"));
        assert_eq!(input.peek(4).unwrap(), b"abcd");
        input.consume(2);
        assert_eq!(input.peek(10).unwrap(), b"cdef");

        let mut rest = String::new();
        input.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "cdef");
    }
}
