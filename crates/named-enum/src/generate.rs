//! Value-generation hooks used by `auto` member assignments.

use crate::value::Value;

/// Hook that computes the value of an `auto` member.
///
/// Called with the member name, the start value (always `1`), the number of members
/// assigned so far, and the raw values of those members in declaration order.
pub type GenerateNextValue = fn(name: &str, start: i64, count: usize, last_values: &[Value]) -> Value;

/// Default hook: one more than the most recent numeric value, or `start` when there is none.
///
/// Non-numeric earlier values are skipped, so `auto` after a string member continues from
/// the last integer before it.
pub fn auto_increment(_name: &str, start: i64, _count: usize, last_values: &[Value]) -> Value {
    for value in last_values.iter().rev() {
        match value {
            Value::Int(i) => {
                if let Some(next) = i.checked_add(1) {
                    return Value::Int(next);
                }
            }
            Value::Bool(b) => return Value::Int(i64::from(*b) + 1),
            Value::Float(f) => return Value::Float(f + 1.0),
            _ => {}
        }
    }
    Value::Int(start)
}

/// Hook that uses the lowercased member name as its value.
pub fn lowercase_name(name: &str, _start: i64, _count: usize, _last_values: &[Value]) -> Value {
    Value::String(name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_increment_follows_last_number() {
        assert_eq!(auto_increment("A", 1, 0, &[]), Value::Int(1));
        assert_eq!(auto_increment("C", 1, 2, &[Value::Int(1), Value::Int(5)]), Value::Int(6));
        assert_eq!(
            auto_increment("C", 1, 2, &[Value::Int(3), Value::from("x")]),
            Value::Int(4)
        );
        assert_eq!(auto_increment("B", 1, 1, &[Value::from(("a", "b"))]), Value::Int(1));
    }

    #[test]
    fn lowercase_name_uses_member_name() {
        assert_eq!(lowercase_name("RED", 1, 0, &[]), Value::from("red"));
    }
}
