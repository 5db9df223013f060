use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use super::{ExtractionError, TextExtractor, DOCX_MEDIA_TYPE};

/// WordprocessingML (.docx) body text extractor backed by `docx-rs`.
/// Emits one line per paragraph, table cells included.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn media_type(&self) -> &'static str {
        DOCX_MEDIA_TYPE
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = read_docx(bytes).map_err(|e| ExtractionError::Parse {
            format: "DOCX",
            message: e.to_string(),
        })?;

        let mut text = String::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => push_paragraph(p, &mut text),
                DocumentChild::Table(t) => push_table(t, &mut text),
                _ => {}
            }
        }
        Ok(text)
    }
}

fn push_paragraph(paragraph: &Paragraph, out: &mut String) {
    for child in &paragraph.children {
        push_paragraph_child(child, out);
    }
    out.push('\n');
}

fn push_paragraph_child(child: &ParagraphChild, out: &mut String) {
    match child {
        ParagraphChild::Run(run) => push_run(run, out),
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                push_paragraph_child(inner, out);
            }
        }
        _ => {}
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn push_table(table: &Table, out: &mut String) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                if let TableCellContent::Paragraph(p) = content {
                    push_paragraph(p, out);
                }
            }
        }
    }
}
