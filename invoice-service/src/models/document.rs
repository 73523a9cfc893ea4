//! Display-ready invoice document shared by the preview and print surfaces.

use serde::{Deserialize, Serialize};

/// Section of an invoice document, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    BillTo,
    VehicleDetails,
    Items,
    Totals,
    Notes,
    Terms,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::BillTo => "bill_to",
            SectionKind::VehicleDetails => "vehicle_details",
            SectionKind::Items => "items",
            SectionKind::Totals => "totals",
            SectionKind::Notes => "notes",
            SectionKind::Terms => "terms",
        }
    }
}

/// Preformatted row. Consumers lay these out but never reformat values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayRow {
    Field { label: String, value: String },
    Line { text: String },
    TableHeader { cells: Vec<String> },
    TableRow { cells: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub kind: SectionKind,
    pub title: String,
    pub rows: Vec<DisplayRow>,
}

impl DocumentSection {
    /// Value of the first field row with `label`.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.rows.iter().find_map(|row| match row {
            DisplayRow::Field { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub sections: Vec<DocumentSection>,
}

impl InvoiceDocument {
    pub fn section(&self, kind: SectionKind) -> Option<&DocumentSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Plain-text rendering for text-only printers and logs.
    pub fn to_text(&self) -> String {
        let mut blocks = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            let mut lines = vec![section.title.clone()];
            for row in &section.rows {
                lines.push(match row {
                    DisplayRow::Field { label, value } => format!("{}: {}", label, value),
                    DisplayRow::Line { text } => text.clone(),
                    DisplayRow::TableHeader { cells } | DisplayRow::TableRow { cells } => {
                        cells.join(" | ")
                    }
                });
            }
            blocks.push(lines.join("\n"));
        }
        blocks.join("\n\n")
    }
}

/// Consumer of an invoice document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Preview,
    Print,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Preview => "preview",
            Surface::Print => "print",
        }
    }

    pub fn layout(&self) -> Option<PrintLayout> {
        match self {
            Surface::Preview => None,
            Surface::Print => Some(PrintLayout::default()),
        }
    }
}

/// Page rules for the print surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintLayout {
    pub page_size: String,
    pub margin: String,
    pub force_color_adjust: bool,
    pub hide_chrome: bool,
}

impl Default for PrintLayout {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            margin: "0.5in".to_string(),
            force_color_adjust: true,
            hide_chrome: true,
        }
    }
}

/// Document bound to the surface it is rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedInvoice {
    pub surface: Surface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<PrintLayout>,
    pub document: InvoiceDocument,
}

impl RenderedInvoice {
    pub fn new(surface: Surface, document: InvoiceDocument) -> Self {
        Self {
            surface,
            layout: surface.layout(),
            document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvoiceDocument {
        InvoiceDocument {
            invoice_number: "INV-1".to_string(),
            sections: vec![
                DocumentSection {
                    kind: SectionKind::Items,
                    title: "ITEMS".to_string(),
                    rows: vec![
                        DisplayRow::TableHeader {
                            cells: vec!["Description".to_string(), "Amount".to_string()],
                        },
                        DisplayRow::TableRow {
                            cells: vec!["Oil change".to_string(), "₹500.00".to_string()],
                        },
                    ],
                },
                DocumentSection {
                    kind: SectionKind::Totals,
                    title: "TOTALS".to_string(),
                    rows: vec![DisplayRow::Field {
                        label: "Total Amount".to_string(),
                        value: "₹500.00".to_string(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_to_text() {
        assert_eq!(
            sample().to_text(),
            "ITEMS\nDescription | Amount\nOil change | ₹500.00\n\nTOTALS\nTotal Amount: ₹500.00"
        );
    }

    #[test]
    fn test_field_lookup() {
        let document = sample();
        let totals = document.section(SectionKind::Totals).unwrap();
        assert_eq!(totals.field("Total Amount"), Some("₹500.00"));
        assert_eq!(totals.field("Subtotal"), None);
    }

    #[test]
    fn test_only_print_surface_has_layout() {
        assert!(Surface::Preview.layout().is_none());
        let layout = Surface::Print.layout().unwrap();
        assert_eq!(layout.page_size, "A4");
        assert!(layout.force_color_adjust);
    }
}
