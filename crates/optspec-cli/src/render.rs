use optspec::{Assignment, Cardinality, Collection, Config, Descriptor, Matches};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeReport<'a> {
    pub config: &'a Config,
    pub options: Vec<&'a Descriptor>,
}

fn cardinality(c: Cardinality) -> &'static str {
    match c {
        Cardinality::AtMostOne => "once",
        Cardinality::AnyCount => "many",
    }
}

fn assignment(a: Assignment) -> &'static str {
    match a {
        Assignment::Forbidden => "flag",
        Assignment::RequiredInline => "--opt=VALUE",
        Assignment::OptionalInline => "--opt[=]VALUE",
        Assignment::ForbiddenInline => "--opt VALUE",
    }
}

fn value_kind(d: &Descriptor) -> String {
    if !d.assignment().takes_value() {
        return "-".to_string();
    }
    let ty = d.value_type().describe();
    match d.collection() {
        Collection::Scalar => ty.to_string(),
        Collection::List => format!("list<{ty}>"),
    }
}

fn table(rows: Vec<[String; 5]>) -> String {
    let mut widths = [0usize; 5];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Human-readable listing of declared options.
pub fn describe<'a>(config: &Config, options: impl Iterator<Item = &'a Descriptor>) -> String {
    let mut out = format!(
        "mode: {:?}, case-sensitive: {}, error-on-unknown: {}\n",
        config.input_mode, config.case_sensitive, config.error_on_unknown
    );

    let mut rows = vec![[
        "NAME".to_string(),
        "HANDLES".to_string(),
        "REPEAT".to_string(),
        "ASSIGN".to_string(),
        "VALUE".to_string(),
    ]];
    for d in options {
        let mut name = d.name().to_string();
        if d.is_subcommand() {
            name.push_str(" (subcommand)");
        }
        rows.push([
            name,
            d.handles().join(", "),
            cardinality(d.cardinality()).to_string(),
            assignment(d.assignment()).to_string(),
            value_kind(d),
        ]);
    }
    out.push('\n');
    out.push_str(&table(rows));
    out
}

/// Human-readable rendering of a match result.
pub fn matches(m: &Matches) -> String {
    let mut out = String::new();
    if m.iter().next().is_some() {
        out.push_str("Options:\n");
        let width = m.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, values) in m.iter() {
            out.push_str(&format!("  {name:width$}  {}\n", values.join(", ")));
        }
    }
    if !m.positionals().is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Positionals:\n");
        for p in m.positionals() {
            out.push_str(&format!("  {p}\n"));
        }
    }
    if out.is_empty() {
        out.push_str("(no options or positionals)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use optspec::RegistryBuilder;

    #[test]
    fn describe_lists_every_option() {
        let mut b = RegistryBuilder::new();
        b.option("-w|--wife=!s").unwrap();
        b.option("--nums*=[i]").unwrap();
        b.option("-v").unwrap();
        let reg = b.freeze().unwrap();

        let text = describe(reg.config(), reg.iter());
        assert!(text.contains("-w, --wife"));
        assert!(text.contains("--opt VALUE"));
        assert!(text.contains("list<integer>"));
        assert!(text.contains("many"));
    }

    #[test]
    fn matches_lists_options_then_positionals() {
        let mut b = RegistryBuilder::new();
        b.option("-age=?i").unwrap();
        let reg = b.freeze().unwrap();
        let m = reg.parse(&["data", "-age", "42"]).unwrap();

        let text = matches(&m);
        let opts = text.find("Options:").unwrap();
        let pos = text.find("Positionals:").unwrap();
        assert!(opts < pos);
        assert!(text.contains("age  42"));
        assert!(text.contains("  data"));

        let empty = reg.parse::<&str>(&[]).unwrap();
        assert_eq!(matches(&empty), "(no options or positionals)\n");
    }
}
