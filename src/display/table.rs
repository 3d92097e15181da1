use super::escape::EscapePolicy;
use crate::api::models::{Field, Record};

/// Closing markup shared by every table layout
pub const FOOTER: &str = "</tbody></table>";

const FULL_HEADER: &str = concat!(
    r#"<table class="persona-list"><thead>"#,
    "<th>ID</th><th>Name</th><th>Surname</th><th>Address</th>",
    "<th>Years of participation</th><th>Olympic appearances</th><th>Category</th>",
    "</thead><tbody>"
);

const NAMES_HEADER: &str = concat!(
    r#"<table class="persona-list"><thead>"#,
    "<th>ID</th><th>Name</th><th>Surname</th>",
    "</thead><tbody>"
);

/// Column set of a rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// id, name, surname, address, years, appearances, category
    Full,
    /// id, name, surname
    Names,
}

impl TableLayout {
    pub fn header(&self) -> &'static str {
        match self {
            TableLayout::Full => FULL_HEADER,
            TableLayout::Names => NAMES_HEADER,
        }
    }

    pub fn column_count(&self) -> usize {
        match self {
            TableLayout::Full => 7,
            TableLayout::Names => 3,
        }
    }
}

/// HTML table renderer for persona records.
///
/// Cells are written through one [`EscapePolicy`]; with the default `Raw`
/// policy field values are inserted verbatim and must be trusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTable {
    escape: EscapePolicy,
}

impl HtmlTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape(mut self, escape: EscapePolicy) -> Self {
        self.escape = escape;
        self
    }

    pub fn escape(&self) -> EscapePolicy {
        self.escape
    }

    pub fn header(&self, layout: TableLayout) -> &'static str {
        layout.header()
    }

    pub fn footer(&self) -> &'static str {
        FOOTER
    }

    fn cell(&self, record: &Record, field: Field) -> String {
        self.escape.apply(&record.display(field)).into_owned()
    }

    /// Row with every column; the surname cell keeps its historical leading space.
    pub fn full_row(&self, record: &Record) -> String {
        let id = self.cell(record, Field::Id);
        format!(
            r#"<tr title="{id}"><td>{id}</td><td>{}</td><td> {}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            self.cell(record, Field::Name),
            self.cell(record, Field::Surname),
            self.cell(record, Field::Address),
            self.cell(record, Field::Years),
            self.cell(record, Field::Appearances),
            self.cell(record, Field::Category),
        )
    }

    pub fn names_row(&self, record: &Record) -> String {
        let id = self.cell(record, Field::Id);
        format!(
            r#"<tr title="{id}"><td>{id}</td><td>{}</td><td> {}</td></tr>"#,
            self.cell(record, Field::Name),
            self.cell(record, Field::Surname),
        )
    }

    pub fn row(&self, record: &Record, layout: TableLayout) -> String {
        match layout {
            TableLayout::Full => self.full_row(record),
            TableLayout::Names => self.names_row(record),
        }
    }

    /// `header + rows + footer`; an empty slice yields `header + footer`.
    pub fn render(&self, records: &[Record], layout: TableLayout) -> String {
        log::debug!(
            "Rendering {} rows of {} columns",
            records.len(),
            layout.column_count()
        );
        render_rows(layout.header(), records, |record| self.row(record, layout))
    }
}

/// Assemble a table from any header and row function.
pub fn render_rows<F>(header: &str, records: &[Record], row_fn: F) -> String
where
    F: Fn(&Record) -> String,
{
    let mut html = String::from(header);
    for record in records {
        html.push_str(&row_fn(record));
    }
    html.push_str(FOOTER);
    html
}
