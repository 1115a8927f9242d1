//! Built-in katas and their hand-written pytest suites.
//!
//! These make the harness runnable without any external test generator.

use crate::error::RegistryError;
use crate::tasks::{Task, TaskRegistry};

pub const SUM_POSITIVES: &str = "sum_positives";
pub const IS_PALINDROME: &str = "is_palindrome";

const SUM_POSITIVES_DESCRIPTION: &str = "Given a list of integers, return the sum of all strictly \
positive values. Zeros and negative numbers must be ignored.";

const SUM_POSITIVES_REFERENCE: &str = r#"
def sum_positives(nums: list[int]) -> int:
    """Return the sum of strictly positive integers in the input list."""
    return sum(n for n in nums if n > 0)
"#;

const SUM_POSITIVES_SKIPS_LAST: &str = r#"
def sum_positives(nums: list[int]) -> int:
    """Ignores the last element in the list."""
    total = 0
    for i in range(len(nums) - 1):
        if nums[i] > 0:
            total += nums[i]
    return total
"#;

const SUM_POSITIVES_COUNTS_ZERO: &str = r#"
def sum_positives(nums: list[int]) -> int:
    """Treats zero as positive."""
    total = 0
    for n in nums:
        if n >= 0:
            total += n
    return total
"#;

const IS_PALINDROME_DESCRIPTION: &str = "Return True if a string is a palindrome, ignoring case \
and whitespace. Non-space characters must be compared case-insensitively.";

const IS_PALINDROME_REFERENCE: &str = r#"
def is_palindrome(s: str) -> bool:
    """Return True if s is a palindrome, ignoring case and spaces."""
    cleaned = "".join(ch.lower() for ch in s if not ch.isspace())
    return cleaned == cleaned[::-1]
"#;

const IS_PALINDROME_CASE_SENSITIVE: &str = r#"
def is_palindrome(s: str) -> bool:
    """Case-sensitive and space-sensitive."""
    return s == s[::-1]
"#;

const IS_PALINDROME_ODD_LENGTH: &str = r#"
def is_palindrome(s: str) -> bool:
    """Mishandles odd-length strings and whitespace."""
    s = s.replace(" ", "")
    n = len(s)
    return s[: n // 2] == s[: n // 2 : -1]
"#;

pub fn sum_positives() -> Task {
    Task::new(
        SUM_POSITIVES,
        SUM_POSITIVES_DESCRIPTION,
        "sum_positives",
        SUM_POSITIVES_REFERENCE,
        vec![
            SUM_POSITIVES_SKIPS_LAST.to_string(),
            SUM_POSITIVES_COUNTS_ZERO.to_string(),
        ],
    )
}

pub fn is_palindrome() -> Task {
    Task::new(
        IS_PALINDROME,
        IS_PALINDROME_DESCRIPTION,
        "is_palindrome",
        IS_PALINDROME_REFERENCE,
        vec![
            IS_PALINDROME_CASE_SENSITIVE.to_string(),
            IS_PALINDROME_ODD_LENGTH.to_string(),
        ],
    )
}

/// Registry holding every built-in kata, in a stable order.
pub fn builtin_registry() -> Result<TaskRegistry, RegistryError> {
    TaskRegistry::new(vec![sum_positives(), is_palindrome()])
}

pub fn sum_positives_tests(task: &Task, module: &str) -> String {
    format!(
        r#"import pytest
from {m} import {f}


@pytest.mark.parametrize(
    "nums, expected",
    [
        ([], 0),
        ([1, 2, 3], 6),
        ([-1, -2, -3], 0),
        ([-1, 0, 4, 5], 9),
        ([0, 1, -2, 3, -4], 4),
    ],
)
def test_sum_positives_basic(nums, expected):
    assert {f}(nums) == expected


def test_sum_positives_large_values():
    data = [1000, -5, 2000, 0, -1]
    assert {f}(data) == 3000


def test_sum_positives_edge_cases():
    assert {f}([0, 0, 0]) == 0
    assert {f}([-1]) == 0
"#,
        m = module,
        f = task.entry_point
    )
}

pub fn is_palindrome_tests(task: &Task, module: &str) -> String {
    format!(
        r#"import pytest
from {m} import {f}


@pytest.mark.parametrize(
    "s, expected",
    [
        ("", True),
        ("a", True),
        ("abba", True),
        ("abc", False),
        ("RaceCar", True),
        ("nurses run", True),
        ("not a palindrome", False),
    ],
)
def test_is_palindrome_cases_and_spaces(s, expected):
    assert {f}(s) == expected


def test_is_palindrome_tricky_spacing():
    assert {f}(" r a c e c a r ")
"#,
        m = module,
        f = task.entry_point
    )
}
