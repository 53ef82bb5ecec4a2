/// Clause currently being written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlJoin,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectGroupBy,
    SqlSelectHaving,
    SqlSelectLimit,
    SqlSelectOrderBy,
    SqlSelectWhere,
}

/// Writer state threaded through one statement build.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Number of placeholders written so far, nested subqueries included.
    pub counter: u32,
    pub fragment: Fragment,
}

impl Context {
    pub fn new(fragment: Fragment) -> Self {
        Self {
            counter: 0,
            fragment,
        }
    }
    pub fn update_from(&mut self, context: &Context) {
        self.counter = context.counter;
    }
    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        ContextUpdater {
            current: Context { fragment, ..*self },
            previous: self,
        }
    }
}

/// Scoped fragment switch, the placeholder counter flows back on drop.
pub struct ContextUpdater<'a> {
    pub current: Context,
    pub previous: &'a mut Context,
}

impl<'a> Drop for ContextUpdater<'a> {
    fn drop(&mut self) {
        self.previous.update_from(&self.current);
    }
}
