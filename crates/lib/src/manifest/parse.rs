//! XML manifest parsing.
//!
//! The manifest is a tree of `category`/`list` grouping elements with
//! `component` leaves. A component's ID is the `-`-joined `id` path of every
//! enclosing grouping element plus its own:
//!
//! ```xml
//! <list url="https://repo.example/components/">
//!   <category id="core">
//!     <category id="server">
//!       <component id="gamezip" hash="1a2b3c4d" install-size="100"/>
//!     </category>
//!   </category>
//! </list>
//! ```
//!
//! yields a single component `core-server-gamezip` served from
//! `https://repo.example/components/core-server-gamezip.zip`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace};

use super::ManifestError;
use super::types::{Catalog, Component};
use crate::consts::ID_SEPARATOR;

const ROOT_URL_ATTR: &str = "url";

/// Element kinds that take part in the ID hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
  Group,
  Component,
}

impl NodeKind {
  fn from_tag(tag: &[u8]) -> Option<Self> {
    match tag {
      b"category" | b"list" => Some(Self::Group),
      b"component" => Some(Self::Component),
      _ => None,
    }
  }
}

/// Join a parent ID and a node's own ID.
fn join_id(parent: &str, id: &str) -> String {
  match (parent.is_empty(), id.is_empty()) {
    (false, false) => format!("{}{}{}", parent, ID_SEPARATOR, id),
    (true, _) => id.to_string(),
    (false, true) => parent.to_string(),
  }
}

/// Attribute values of one element, unescaped.
struct Attrs {
  pairs: Vec<(Vec<u8>, String)>,
}

impl Attrs {
  fn read(element: &BytesStart<'_>) -> Result<Self, ManifestError> {
    let mut pairs = Vec::new();
    for attr in element.attributes() {
      let attr = attr.map_err(quick_xml::Error::from)?;
      let value = attr.unescape_value()?.into_owned();
      pairs.push((attr.key.local_name().as_ref().to_vec(), value));
    }
    Ok(Self { pairs })
  }

  fn get(&self, name: &str) -> &str {
    self
      .pairs
      .iter()
      .find(|(key, _)| key.as_slice() == name.as_bytes())
      .map(|(_, value)| value.as_str())
      .unwrap_or("")
  }

  /// Numeric attributes fall back to zero when missing or malformed.
  fn get_u64(&self, name: &str) -> u64 {
    self.get(name).trim().parse().unwrap_or(0)
  }

  fn get_timestamp(&self, name: &str) -> Option<i64> {
    self.get(name).trim().parse().ok()
  }
}

fn normalize_repo_url(url: &str) -> String {
  if url.is_empty() || url.ends_with('/') {
    url.to_string()
  } else {
    format!("{}/", url)
  }
}

fn build_component(attrs: &Attrs, id: String, repo_url: &str) -> Component {
  let url = format!("{}{}.zip", repo_url, id);
  Component {
    title: attrs.get("title").to_string(),
    description: attrs.get("description").to_string(),
    directory: attrs.get("path").to_string(),
    hash: attrs.get("hash").to_string(),
    url,
    download_size: attrs.get_u64("download-size"),
    install_size: attrs.get_u64("install-size"),
    last_updated: attrs.get_timestamp("date-modified"),
    dependencies: attrs.get("depends").split_whitespace().map(str::to_string).collect(),
    ..Component::new(id)
  }
}

/// Parse a manifest document into a catalog.
///
/// Traversal keeps an explicit stack with one frame per open element. A frame
/// holds the accumulated ID for children, or `None` inside elements that do
/// not take part in the hierarchy (their whole subtree is ignored).
pub fn parse_manifest(data: &[u8]) -> Result<Catalog, ManifestError> {
  let mut reader = Reader::from_reader(data);
  reader.config_mut().trim_text(true);

  let mut buf = Vec::new();
  let mut stack: Vec<Option<String>> = Vec::new();
  let mut catalog: Option<Catalog> = None;

  loop {
    let event = reader.read_event_into(&mut buf)?;
    match event {
      Event::Start(ref element) | Event::Empty(ref element) => {
        let is_empty = matches!(event, Event::Empty(_));

        let frame = match catalog.as_mut() {
          None => {
            let attrs = Attrs::read(element)?;
            let repo_url = normalize_repo_url(attrs.get(ROOT_URL_ATTR));
            debug!(repo_url = %repo_url, "parsing manifest");
            catalog = Some(Catalog::new(repo_url));
            Some(String::new())
          }
          Some(current) => {
            let parent = stack.last().cloned().flatten();
            let kind = NodeKind::from_tag(element.local_name().as_ref());
            match (parent, kind) {
              (Some(parent), Some(kind)) => {
                let attrs = Attrs::read(element)?;
                let full_id = join_id(&parent, attrs.get("id"));
                if kind == NodeKind::Component {
                  trace!(id = %full_id, "component");
                  let component = build_component(&attrs, full_id.clone(), current.repo_url());
                  current.insert(component);
                }
                Some(full_id)
              }
              _ => None,
            }
          }
        };

        if !is_empty {
          stack.push(frame);
        }
      }
      Event::End(_) => {
        stack.pop();
      }
      Event::Eof => {
        if !stack.is_empty() {
          return Err(ManifestError::Unclosed { depth: stack.len() });
        }
        break;
      }
      _ => {}
    }
    buf.clear();
  }

  let catalog = catalog.ok_or(ManifestError::MissingRoot)?;
  debug!(components = catalog.len(), "manifest parsed");
  Ok(catalog)
}
