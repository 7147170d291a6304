//! Member access checks across module boundaries.
//!
//! [`AccessChecker::can_access`] decides whether code in a requesting module may use a
//! resolved member:
//!
//! 1. Both modules must be registered in the [`ModuleReadGraph`]
//! 2. Members are always accessible from their own module
//! 3. Public members are accessible from every module that reads the declaring module
//! 4. Non-public members additionally need a [`FriendPolicy`] grant; package, protected and
//!    nestmate rules are the policy's business, not this checker's
//!
//! The checker never mutates the graph.

use crate::{
    metadata::{member::MemberRecord, token::ModuleId},
    module::ModuleReadGraph,
    Result,
};

/// Decides cross-module access to non-public members.
pub trait FriendPolicy: Send + Sync {
    /// Returns true if code in `requesting` may access the non-public `member`
    fn allows(&self, requesting: ModuleId, member: &MemberRecord) -> bool;
}

/// Policy that never grants access to non-public members of other modules
pub struct NoFriends;

impl FriendPolicy for NoFriends {
    fn allows(&self, _requesting: ModuleId, _member: &MemberRecord) -> bool {
        false
    }
}

/// Evaluates member visibility against the module read graph
pub struct AccessChecker<'a> {
    graph: &'a ModuleReadGraph,
    friends: &'a dyn FriendPolicy,
}

impl<'a> AccessChecker<'a> {
    /// Create a checker that denies non-public cross-module access
    ///
    /// ## Arguments
    /// * 'graph' - The module read graph to consult
    pub fn new(graph: &'a ModuleReadGraph) -> Self {
        AccessChecker {
            graph,
            friends: &NoFriends,
        }
    }

    /// Use `friends` to decide access to non-public members of other modules
    #[must_use]
    pub fn with_friends(mut self, friends: &'a dyn FriendPolicy) -> Self {
        self.friends = friends;
        self
    }

    /// Returns true if code in `requesting` may access `member`
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the requesting module or the member's
    /// declaring module is null or not registered in the graph.
    pub fn can_access(&self, requesting: ModuleId, member: &MemberRecord) -> Result<bool> {
        self.graph.require(requesting, "requesting")?;
        self.graph.require(member.declaring_module, "declaring")?;

        if requesting == member.declaring_module {
            return Ok(true);
        }
        if !self.graph.can_read(requesting, member.declaring_module)? {
            return Ok(false);
        }
        if member.flags.is_public() {
            return Ok(true);
        }
        Ok(self.friends.allows(requesting, member))
    }

    /// Shorthand for [`ModuleReadGraph::can_read`]
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if either module is null or not registered.
    pub fn can_read(&self, from: ModuleId, to: ModuleId) -> Result<bool> {
        self.graph.can_read(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{flags::AccessFlags, member::MemberKind, token::ClassId},
        Error,
    };

    fn member(module: ModuleId, flags: AccessFlags) -> MemberRecord {
        MemberRecord {
            name: "eval".to_string(),
            descriptor: "(Ljava/lang/String;)Ljava/lang/Object;".to_string(),
            flags,
            kind: MemberKind::Method,
            declaring_class: ClassId::new(1),
            declaring_module: module,
            idnum: 0,
        }
    }

    struct Everyone;

    impl FriendPolicy for Everyone {
        fn allows(&self, _requesting: ModuleId, _member: &MemberRecord) -> bool {
            true
        }
    }

    #[test]
    fn public_requires_read_edge() {
        let graph = ModuleReadGraph::new();
        let logging = graph.define_module("java.logging").unwrap();
        let scripting = graph.define_module("java.scripting").unwrap();
        let eval = member(scripting, AccessFlags::PUBLIC);
        let checker = AccessChecker::new(&graph);

        assert!(!checker.can_access(logging, &eval).unwrap());
        graph.add_reads(logging, scripting).unwrap();
        assert!(checker.can_access(logging, &eval).unwrap());
        assert!(checker.can_access(scripting, &eval).unwrap());
    }

    #[test]
    fn non_public_needs_same_module_or_friend() {
        let graph = ModuleReadGraph::new();
        let a = graph.define_module("a").unwrap();
        let b = graph.define_module("b").unwrap();
        graph.add_reads(a, b).unwrap();

        let hidden = member(b, AccessFlags::PRIVATE);
        assert!(AccessChecker::new(&graph).can_access(b, &hidden).unwrap());
        assert!(!AccessChecker::new(&graph).can_access(a, &hidden).unwrap());

        let friendly = AccessChecker::new(&graph).with_friends(&Everyone);
        assert!(friendly.can_access(a, &hidden).unwrap());

        // A friend grant does not replace readability
        let c = graph.define_module("c").unwrap();
        assert!(!friendly.can_access(c, &hidden).unwrap());
    }

    #[test]
    fn unnamed_module_sees_public_members() {
        let graph = ModuleReadGraph::new();
        let named = graph.define_module("named").unwrap();
        let checker = AccessChecker::new(&graph);

        assert!(checker
            .can_access(ModuleId::UNNAMED, &member(named, AccessFlags::PUBLIC))
            .unwrap());
        assert!(!checker
            .can_access(ModuleId::UNNAMED, &member(named, AccessFlags::empty()))
            .unwrap());
        assert!(checker
            .can_access(named, &member(ModuleId::UNNAMED, AccessFlags::PUBLIC))
            .unwrap());
    }

    #[test]
    fn invalid_modules() {
        let graph = ModuleReadGraph::new();
        let checker = AccessChecker::new(&graph);
        let eval = member(ModuleId::UNNAMED, AccessFlags::PUBLIC);

        assert!(matches!(
            checker.can_access(ModuleId::NULL, &eval),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            checker.can_access(ModuleId::UNNAMED, &member(ModuleId::new(42), AccessFlags::PUBLIC)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            checker.can_read(ModuleId::UNNAMED, ModuleId::NULL),
            Err(Error::InvalidArgument(_))
        ));
    }
}
