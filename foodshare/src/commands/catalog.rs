// foodshare/src/commands/catalog.rs
//
// USE CASE: List the report catalog.

use foodshare_core::domain::catalog::CATALOG;

use super::table::new_table;

pub fn execute() {
    let mut table = new_table(["#", "Slug", "Title", "Family"]);
    for query in CATALOG.iter() {
        table.add_row(vec![
            query.number.to_string(),
            query.slug.to_string(),
            query.title.to_string(),
            query.family.to_string(),
        ]);
    }
    println!("{table}");
    println!("Run one with `foodshare query <number|slug>` or all with `foodshare query --all`.");
}
