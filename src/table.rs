use std::collections::HashMap;

use crate::domain::Domain;
use crate::error::{configuration, Result};
use crate::rule::Rule;
use crate::set::Set;

/// Resolves `alias.set` against the namespace and the domain's registry.
fn resolve(expr: &str, namespace: &HashMap<&str, &Domain>) -> Result<Set> {
    let (alias, name) = expr
        .split_once('.')
        .ok_or_else(|| configuration(format!("{expr:?} is not of the form domain.set")))?;
    let domain = namespace
        .get(alias)
        .ok_or_else(|| configuration(format!("unknown domain {alias:?} in {expr:?}")))?;

    domain
        .set(name)
        .ok_or_else(|| configuration(format!("{domain} has no set {name:?}")))
}

/// Builds a rule from a two dimensional table.
///
/// The first line lists the column antecedents, every further line a row antecedent
/// followed by the consequent for each column. Cells are separated by tabs or spaces and
/// name sets as `alias.set`, the aliases being looked up in `namespace`:
///
/// ```text
///             tan.klein   tan.mittel  tan.groß
/// temp.kalt   gef.klein   gef.klein   gef.mittel
/// temp.heiß   gef.klein   gef.groß    gef.groß
/// ```
pub fn rule_from_table<'a>(table: &str, namespace: impl IntoIterator<Item = (&'a str, &'a Domain)>) -> Result<Rule> {
    let namespace: HashMap<_, _> = namespace.into_iter().collect();
    let mut lines = table.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| configuration("rule table is empty"))?;
    let columns = header
        .split_whitespace()
        .map(|expr| resolve(expr, &namespace))
        .collect::<Result<Vec<_>>>()?;
    let mut conditions = Vec::new();

    for line in lines {
        let mut cells = line.split_whitespace();
        // lines are trimmed and non-empty, there is always a first cell
        let Some(row) = cells.next() else { continue };
        let row = resolve(row, &namespace)?;
        let consequents = cells.map(|expr| resolve(expr, &namespace)).collect::<Result<Vec<_>>>()?;

        if consequents.len() != columns.len() {
            return Err(configuration(format!(
                "row {row} has {} consequents for {} columns",
                consequents.len(),
                columns.len()
            )));
        }

        for (column, then) in columns.iter().zip(consequents) {
            conditions.push(([row.clone(), column.clone()], then));
        }
    }

    Rule::new(conditions)
}

#[test]
fn test_table_matches_handwritten() {
    use crate::rule::Caro;

    let caro = Caro::new();
    let table = "
            tan.klein	tan.mittel	tan.groß
temp.kalt	gef.klein	gef.klein	gef.mittel
temp.mittel	gef.klein	gef.mittel	gef.groß
temp.heiß	gef.klein	gef.groß	gef.groß
";
    let namespace = [("temp", &caro.temp), ("tan", &caro.tan), ("gef", &caro.gef)];
    let table_rules = rule_from_table(table, namespace).unwrap();

    assert_eq!(table_rules, caro.rules());
    assert_eq!(table_rules.len(), 9);
}

#[test]
fn test_table_errors() {
    use crate::rule::Caro;

    let caro = Caro::new();
    let namespace = || [("temp", &caro.temp), ("tan", &caro.tan), ("gef", &caro.gef)];

    assert!(rule_from_table("", namespace()).is_err());
    assert!(rule_from_table("tan.klein\ntemp.kalt gef.klein gef.groß", namespace()).is_err());
    assert!(rule_from_table("tan.tiny\ntemp.kalt gef.klein", namespace()).is_err());
    assert!(rule_from_table("foo.klein\ntemp.kalt gef.klein", namespace()).is_err());
    assert!(rule_from_table("klein\ntemp.kalt gef.klein", namespace()).is_err());

    let single = rule_from_table("tan.klein\ntemp.kalt gef.klein", namespace()).unwrap();
    let kalt = caro.temp.set("kalt").unwrap();
    let klein = caro.tan.set("klein").unwrap();
    assert_eq!(single.get([klein, kalt]), caro.gef.set("klein").as_ref());
}
