//! Namespace-aware, forward-only XML event source.
//!
//! [`parse_markup`] reads XML with quick-xml's `NsReader` and reports what it
//! sees to a [`MarkupHandler`]: element opens and closes with resolved
//! namespace URIs, character data, and three grades of problems.
//!
//! - warnings: document type declarations and non-UTF-8 encoding declarations;
//! - errors: recoverable problems (undeclared prefixes, malformed attributes,
//!   unknown entity references), after which parsing continues;
//! - fatal errors: anything the reader cannot get past, after which parsing
//!   stops with [`Error::MarkupProcessingFailed`].

use crate::error::{io_from_shared, Error, MarkupIssue, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::io::BufRead;

/// An element name resolved against the namespace declarations in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    /// Namespace URI, or `None` for names in no namespace.
    pub namespace: Option<&'a [u8]>,
    /// Local part of the name, without prefix.
    pub local_name: &'a [u8],
}

impl<'a> QualifiedName<'a> {
    /// Create a qualified name.
    pub fn new(namespace: Option<&'a [u8]>, local_name: &'a [u8]) -> Self {
        Self {
            namespace,
            local_name,
        }
    }

    /// Check for a specific namespace URI and local name.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace == Some(namespace.as_bytes()) && self.local_name == local_name.as_bytes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    namespace: Option<String>,
    local_name: String,
    value: String,
}

/// Attributes of one element, addressed by namespace URI and local name.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    pub fn push(&mut self, namespace: Option<&str>, local_name: &str, value: impl Into<String>) {
        self.items.push(Attribute {
            namespace: namespace.map(String::from),
            local_name: local_name.to_string(),
            value: value.into(),
        });
    }

    /// Get the unescaped value of an attribute.
    pub fn get(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

/// Receiver of markup events.
///
/// Content callbacks return `Result` so that sink failures abort the parse.
/// Character data for one text node may arrive over several `characters` calls.
pub trait MarkupHandler {
    /// An element was opened.
    fn start_element(&mut self, name: QualifiedName<'_>, attributes: &Attributes) -> Result<()>;

    /// An element was closed.
    fn end_element(&mut self, name: QualifiedName<'_>) -> Result<()>;

    /// A run of character data.
    fn characters(&mut self, text: &str) -> Result<()>;

    /// A condition that does not affect the document's meaning.
    fn warning(&mut self, issue: MarkupIssue) {
        let _ = issue;
    }

    /// A recoverable problem; parsing continues.
    fn error(&mut self, issue: MarkupIssue);

    /// An unrecoverable problem; parsing stops after this call.
    fn fatal_error(&mut self, issue: MarkupIssue);
}

/// Parse XML from `input`, reporting events to `handler`.
///
/// Self-closing elements are reported as an open followed by a close.
///
/// # Errors
///
/// - [`Error::MarkupProcessingFailed`] after a fatal error (the handler has
///   already been told through [`MarkupHandler::fatal_error`]);
/// - [`Error::Io`] when reading fails;
/// - any error returned by the handler's content callbacks, unchanged.
pub fn parse_markup<R, H>(input: R, handler: &mut H) -> Result<()>
where
    R: BufRead,
    H: MarkupHandler + ?Sized,
{
    let mut reader = NsReader::from_reader(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.expand_empty_elements = true;
    config.check_end_names = true;

    let mut buf = Vec::new();
    let mut attributes = Attributes::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let position = reader.buffer_position() as u64;
                depth += 1;
                seen_root = true;

                collect_attributes(&reader, &e, &mut attributes, handler, position);

                let (resolved, local) = reader.resolve_element(e.name());
                let namespace = resolve_namespace(resolved, handler, position);
                handler.start_element(
                    QualifiedName::new(namespace, local.into_inner()),
                    &attributes,
                )?;
            }
            Ok(Event::End(e)) => {
                let position = reader.buffer_position() as u64;
                depth = depth.saturating_sub(1);

                let (resolved, local) = reader.resolve_element(e.name());
                let namespace = resolve_namespace(resolved, handler, position);
                handler.end_element(QualifiedName::new(namespace, local.into_inner()))?;
            }
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(text) => handler.characters(&text)?,
                Err(err) => handler.error(MarkupIssue::new(
                    reader.buffer_position() as u64,
                    format!("invalid character data: {}", err),
                )),
            },
            Ok(Event::CData(e)) => match std::str::from_utf8(&e) {
                Ok(text) => handler.characters(text)?,
                Err(err) => handler.error(MarkupIssue::new(
                    reader.buffer_position() as u64,
                    format!("invalid CDATA section: {}", err),
                )),
            },
            Ok(Event::Decl(e)) => {
                if let Some(Ok(encoding)) = e.encoding() {
                    if !encoding.eq_ignore_ascii_case(b"utf-8") {
                        handler.warning(MarkupIssue::new(
                            reader.buffer_position() as u64,
                            format!(
                                "declared encoding {} is read as UTF-8",
                                String::from_utf8_lossy(&encoding)
                            ),
                        ));
                    }
                }
            }
            Ok(Event::DocType(_)) => {
                handler.warning(MarkupIssue::new(
                    reader.buffer_position() as u64,
                    "document type declaration is not processed",
                ));
            }
            Ok(Event::Eof) => {
                let message = if !seen_root {
                    Some("document has no root element".to_string())
                } else if depth > 0 {
                    Some(format!("unexpected end of document, {} element(s) left open", depth))
                } else {
                    None
                };
                if let Some(message) = message {
                    let issue = MarkupIssue::new(reader.buffer_position() as u64, message);
                    handler.fatal_error(issue.clone());
                    return Err(Error::MarkupProcessingFailed(issue));
                }
                break;
            }
            Err(quick_xml::Error::Io(err)) => return Err(Error::Io(io_from_shared(err))),
            Err(err) => {
                let issue = MarkupIssue::new(reader.error_position() as u64, err.to_string());
                handler.fatal_error(issue.clone());
                return Err(Error::MarkupProcessingFailed(issue));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Turn a resolution result into a namespace URI, reporting unknown prefixes.
fn resolve_namespace<'n, H>(
    resolved: ResolveResult<'n>,
    handler: &mut H,
    position: u64,
) -> Option<&'n [u8]>
where
    H: MarkupHandler + ?Sized,
{
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Some(uri),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            handler.error(MarkupIssue::new(
                position,
                format!(
                    "undeclared namespace prefix `{}`",
                    String::from_utf8_lossy(&prefix)
                ),
            ));
            None
        }
    }
}

/// Resolve and unescape the attributes of `start` into `attributes`.
fn collect_attributes<R, H>(
    reader: &NsReader<R>,
    start: &BytesStart<'_>,
    attributes: &mut Attributes,
    handler: &mut H,
    position: u64,
) where
    H: MarkupHandler + ?Sized,
{
    attributes.clear();

    for attr in start.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(err) => {
                handler.error(MarkupIssue::new(position, format!("malformed attribute: {}", err)));
                continue;
            }
        };

        // Namespace declarations are bookkeeping, not data.
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let value = match attr.unescape_value() {
            Ok(value) => value,
            Err(err) => {
                handler.error(MarkupIssue::new(
                    position,
                    format!("invalid attribute value: {}", err),
                ));
                continue;
            }
        };

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace = resolve_namespace(resolved, handler, position)
            .map(|uri| String::from_utf8_lossy(uri).into_owned());
        attributes.push(
            namespace.as_deref(),
            &String::from_utf8_lossy(local.as_ref()),
            value,
        );
    }
}
