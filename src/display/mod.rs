pub mod escape;
pub mod sink;
pub mod table;
pub mod template;

pub use escape::EscapePolicy;
pub use sink::{ContentSink, MemoryNotifier, MemorySink, Notifier, StderrNotifier, StdoutSink};
pub use table::{FOOTER, HtmlTable, TableLayout, render_rows};
pub use template::{PERSONA_CARD, TOKENS, Template, substitute};
