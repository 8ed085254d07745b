/// Sequential display ids in the `prefix_N` style used across the data
/// files (`course_1`, `doc_2`, `sub_3`). Derived from the highest existing
/// suffix rather than the collection length, so deleting a record can never
/// mint a duplicate id.
pub fn next_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let marker = format!("{}_", prefix);
    let highest = existing
        .filter_map(|id| id.strip_prefix(&marker))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}_{}", prefix, highest + 1)
}
