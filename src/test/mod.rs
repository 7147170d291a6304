//! Factories for member lists used across the unit tests.

use crate::metadata::{flags::AccessFlags, member::RawMember, token::ClassId};

/// The members of the `Foo` example in class-file order: `baz()I`, `bar(I)V`, `bar()V`.
/// The order is strictly descending by key.
pub fn foo_members(class: ClassId) -> Vec<RawMember> {
    vec![
        RawMember::method(class, "baz", "()I", AccessFlags::PUBLIC),
        RawMember::method(class, "bar", "(I)V", AccessFlags::PUBLIC),
        RawMember::method(class, "bar", "()V", AccessFlags::PUBLIC),
    ]
}

/// `count` distinct public `()V` methods named `m00000`, `m00001`, ... in ascending key order
pub fn raw_methods(class: ClassId, count: usize) -> Vec<RawMember> {
    (0..count)
        .map(|i| RawMember::method(class, format!("m{i:05}"), "()V", AccessFlags::PUBLIC))
        .collect()
}
