#[derive(Clone)]
pub(crate) struct State<'s> {
    pub(crate) current_tag_name: Option<&'s str>,
    /// The node is a direct child of the root.
    pub(crate) is_root: bool,
}
