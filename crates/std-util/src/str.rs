use heck::ToSnakeCase;

pub fn snake_case(src: &str) -> String {
    src.to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_words() {
        assert_eq!(snake_case("OrderLine"), "order_line");
        assert_eq!(snake_case("orderLine"), "order_line");
        assert_eq!(snake_case("maxDepth"), "max_depth");
    }
}
