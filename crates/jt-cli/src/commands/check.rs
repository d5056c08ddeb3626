use jt_core::types::tokens;
use jt_core::DirectiveTable;

use crate::context::TopicSource;

pub fn run(source: &TopicSource) -> anyhow::Result<()> {
    print!("{}", render(&source.table()?));
    Ok(())
}

fn render(table: &DirectiveTable) -> String {
    let mut out = String::from("Topic directives\n================\n");
    if table.is_empty() {
        out.push_str("(none; every category uses the owner's username)\n");
        return out;
    }
    for (category, directive) in table.iter() {
        out.push_str(&format!("{:<12}{directive}\n", category.as_str()));
    }
    match table.default_directive() {
        Some(directive) => out.push_str(&format!("{:<12}{directive}\n", tokens::DEFAULT)),
        None => out.push_str(&format!(
            "{:<12}(unset, falls back to {})\n",
            tokens::DEFAULT,
            tokens::USER
        )),
    }
    out
}
