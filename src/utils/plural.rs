/// `"1 document"`, `"3 documents"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "layout"), "0 layouts");
        assert_eq!(plural_count(1, "layout"), "1 layout");
        assert_eq!(plural_count(7, "document"), "7 documents");
    }
}
