//! Load/save of a whole WordprocessingML package
//!
//! [`WordPackage`] ties the archive to its parsed main part and style sheet.
//! Nothing is written anywhere until [`WordPackage::save`] is called, and the
//! output is assembled in memory first.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::archive::{OoxmlArchive, DOCUMENT_PATH, DOCUMENT_RELS_PATH};
use crate::document::{Document, R_NS};
use crate::error::Result;
use crate::header::{resolve_part_path, HeaderPart, HEADER_CONTENT_TYPE};
use crate::relationships::Relationships;
use crate::styles::StyleSheet;

/// An opened DOCX package
#[derive(Debug)]
pub struct WordPackage {
    archive: OoxmlArchive,
    /// The main document part
    pub document: Document,
    /// Style definitions (empty when the package has no styles.xml)
    pub styles: StyleSheet,
}

impl WordPackage {
    /// Open a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Read a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read a package from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_reader(reader)?)
    }

    /// Wrap an unpacked archive
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let document = Document::parse(archive.document_xml()?)?;
        let styles = match archive.styles_xml() {
            Some(xml) => StyleSheet::parse(xml)?,
            None => StyleSheet::default(),
        };
        debug!(
            parts = archive.file_list().count(),
            styles = styles.len(),
            "opened package"
        );
        Ok(Self {
            archive,
            document,
            styles,
        })
    }

    /// The underlying archive
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// The header referenced as `default` by the document's first section.
    ///
    /// That is the section the title page belongs to; later sections
    /// without their own reference inherit it.
    ///
    /// When the section has no default header a new, empty part is created
    /// and registered (relationship, content type, `w:headerReference`). The
    /// returned part must be handed back through [`store_header`] to be saved.
    ///
    /// [`store_header`]: Self::store_header
    pub fn default_header(&mut self) -> Result<HeaderPart> {
        let mut rels = match self.archive.document_rels_xml() {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };

        let existing = self
            .document
            .first_section_mut()?
            .header_reference("default")
            .and_then(|id| rels.get(id))
            .map(resolve_part_path);
        if let Some(path) = existing {
            if let Some(bytes) = self.archive.get(&path) {
                debug!(%path, "using existing default header");
                return HeaderPart::parse(path.as_str(), bytes);
            }
        }

        let mut n = 1;
        while self.archive.contains(&format!("word/header{}.xml", n))
            || rels.has_target(&format!("header{}.xml", n))
        {
            n += 1;
        }
        let target = format!("header{}.xml", n);
        let rel_id = rels.add(&target, Relationships::TYPE_HEADER);
        self.archive
            .ensure_content_type_override(&format!("/word/{}", target), HEADER_CONTENT_TYPE)?;
        self.archive.set(DOCUMENT_RELS_PATH, rels.to_bytes()?);
        self.document.ensure_namespace("r", R_NS);
        self.document
            .first_section_mut()?
            .set_header_reference("default", &rel_id);
        debug!(%target, %rel_id, "created default header");

        let header = HeaderPart::empty(format!("word/{}", target));
        self.archive.set(header.path.clone(), header.to_bytes()?);
        Ok(header)
    }

    /// Write a header part back into the archive
    pub fn store_header(&mut self, header: &HeaderPart) -> Result<()> {
        self.archive.set(header.path.clone(), header.to_bytes()?);
        Ok(())
    }

    /// Serialize the package into DOCX bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        let mut buffer = Cursor::new(Vec::new());
        self.archive.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the package to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.flush()?;
        self.archive.write_to_file(path)
    }

    fn flush(&mut self) -> Result<()> {
        self.archive.set(DOCUMENT_PATH, self.document.to_bytes()?);
        Ok(())
    }
}
