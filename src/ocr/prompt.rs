use chrono::Local;

/// Date label used when none is given: today's local date.
pub fn today_label() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Builds the extraction instruction for one day's lunch menu.
pub fn menu_prompt(date_label: &str) -> String {
    format!(
        r#"This image is a weekly cafeteria menu table. On the left is the restaurant information; on the right is a single column of the table for one day. Each row is a meal type (breakfast, lunch, dinner, ...) and its dishes.

Please do the following:
1. Extract the lunch menu for {date} exactly as written in the table.
2. The menu for that day is in the same column as its date heading.
3. For each corner, list every dish name and the calorie figure when one is shown.
4. Format today's lunch menu so it can be sent to employees as a message.

Use this layout:

**🥗 Lunch (11:30 ~ 13:00)**

*   **[Corner name]** (912Kcal)
    *   Dish 1
    *   Dish 2
    *   ...
*   **[Corner name]** (816Kcal)
    *   Dish 1
    *   Dish 2
    *   ...
*   **[Take out Zone]**
    *   Lunch box: dish (Kcal)
    *   Salad: dish (Kcal)
    *   Sandwich: dish (see label)
"#,
        date = date_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_the_date() {
        let prompt = menu_prompt("Wednesday");
        assert!(prompt.contains("lunch menu for Wednesday"));
        assert!(prompt.contains("[Take out Zone]"));
    }

    #[test]
    fn test_today_label_format() {
        let label = today_label();
        assert_eq!(label.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&label, "%Y-%m-%d").is_ok());
    }
}
