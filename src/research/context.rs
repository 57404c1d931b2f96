//! Case files attached as extra context for the prompt.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Files larger than this are skipped.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Characters taken from each text file.
const FILE_EXCERPT_CHARS: usize = 5_000;

/// Pages read from each PDF.
const PDF_MAX_PAGES: usize = 10;

/// Characters taken from each PDF page.
const PDF_PAGE_CHARS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Text,
    Pdf,
}

fn file_kind(path: &Path) -> Option<FileKind> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    if ["txt", "text", "md"].iter().any(|t| ext.eq_ignore_ascii_case(t)) {
        Some(FileKind::Text)
    } else if ext.eq_ignore_ascii_case("pdf") {
        Some(FileKind::Pdf)
    } else {
        None
    }
}

/// Text of the first [`PDF_MAX_PAGES`] pages, each cut to [`PDF_PAGE_CHARS`] and newline-terminated.
fn pdf_excerpt(bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes).context("Not a readable PDF")?;

    let mut excerpt = String::new();
    for (&page_number, _) in doc.get_pages().iter().take(PDF_MAX_PAGES) {
        let text = doc.extract_text(&[page_number]).with_context(|| format!("Failed to extract text from page {}", page_number))?;
        excerpt.extend(text.chars().take(PDF_PAGE_CHARS));
        excerpt.push('\n');
    }
    Ok(excerpt)
}

async fn read_pdf(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || pdf_excerpt(&bytes)).await.context("PDF extraction task failed")?
}

/// Read the attached files into one context string.
///
/// Oversized, unreadable and unsupported files are skipped with a warning; the
/// query still runs without them.
pub async fn load_context(paths: &[PathBuf]) -> String {
    let mut context = String::new();

    for path in paths {
        let size = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                continue;
            }
        };

        if size > MAX_FILE_SIZE {
            warn!("File {} too large (max 10MB)", path.display());
            continue;
        }

        match file_kind(path) {
            Some(FileKind::Text) => match tokio::fs::read_to_string(path).await {
                Ok(content) => {
                    debug!("📄 Loaded {} ({} bytes)", path.display(), size);
                    context.extend(content.chars().take(FILE_EXCERPT_CHARS));
                    context.push('\n');
                }
                Err(e) => warn!("Error reading {}: {}", path.display(), e),
            },
            Some(FileKind::Pdf) => match read_pdf(path).await {
                Ok(excerpt) => {
                    debug!("📄 Loaded PDF {} ({} bytes)", path.display(), size);
                    context.push_str(&excerpt);
                }
                Err(e) => warn!("Error reading {}: {:#}", path.display(), e),
            },
            None => warn!("Skipping {}: only .txt, .md and .pdf case files are supported", path.display()),
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::{self, File};

    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Write a PDF with one page per entry of `pages`, each showing that text.
    fn write_pdf(path: &Path, pages: &[String]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_loads_text_excerpts_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();

        let brief = dir.path().join("brief.txt");
        fs::write(&brief, "a".repeat(FILE_EXCERPT_CHARS + 100)).unwrap();

        let notes = dir.path().join("notes.MD");
        fs::write(&notes, "prior convictions: theft").unwrap();

        let sheet = dir.path().join("charges.xlsx");
        fs::write(&sheet, b"PK\x03\x04").unwrap();

        let huge = dir.path().join("huge.txt");
        File::create(&huge).unwrap().set_len(MAX_FILE_SIZE + 1).unwrap();

        let missing = dir.path().join("missing.txt");

        let context = load_context(&[brief, sheet, huge, missing, notes]).await;

        let expected = format!("{}\nprior convictions: theft\n", "a".repeat(FILE_EXCERPT_CHARS));
        assert_eq!(context, expected);
    }

    #[tokio::test]
    async fn test_pdf_reads_first_ten_pages() {
        let dir = tempfile::tempdir().unwrap();
        let charge_sheet = dir.path().join("charge-sheet.pdf");
        let pages: Vec<String> = (1..=12).map(|n| format!("Page {} marker", n)).collect();
        write_pdf(&charge_sheet, &pages);

        let context = load_context(&[charge_sheet]).await;

        assert!(context.contains("Page 1 marker"));
        assert!(context.contains("Page 10 marker"));
        assert!(!context.contains("Page 11 marker"));
        assert!(!context.contains("Page 12 marker"));
    }

    #[tokio::test]
    async fn test_pdf_page_text_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = dir.path().join("transcript.pdf");
        write_pdf(&transcript, &["x".repeat(PDF_PAGE_CHARS * 2)]);

        let context = load_context(&[transcript]).await;

        let xs = context.chars().filter(|c| *c == 'x').count();
        assert!(xs > 0 && xs <= PDF_PAGE_CHARS, "got {} chars of page text", xs);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("scan.pdf");
        fs::write(&scan, b"%PDF-1.4 truncated").unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "bail refused").unwrap();

        assert_eq!(load_context(&[scan, notes]).await, "bail refused\n");
    }

    #[tokio::test]
    async fn test_no_files_gives_empty_context() {
        assert_eq!(load_context(&[]).await, "");
    }
}
