#![forbid(unsafe_code)]

//! Per-node field attributes.
//!
//! A form is a [`FieldTree`]: a [`Tree`] whose payload is a [`Field`].
//! Leaves hold scalar inputs; `Group` and `Repeatable` nodes hold other
//! fields and never a value of their own.

use formtree_mask::Mask;
use formtree_tree::Tree;

use crate::FieldId;
use crate::attribute::Attribute;
use crate::error::Error;
use crate::value::Value;

/// A form definition and its live state.
pub type FieldTree<Id> = Tree<Field<Id>>;

/// Field kind; decides coercion and which checks apply.
#[derive(Debug, Clone, PartialEq)]
pub enum InputType<Id> {
    Text,
    TextArea,
    Email,
    Password,
    /// Text input restricted to the option list.
    StrictAutocomplete,
    Integer,
    Float,
    Month,
    Date,
    LocalDatetime,
    Select,
    Radio,
    Checkbox,
    Group,
    /// Holds the template that new entries are cloned from.
    Repeatable(Box<FieldTree<Id>>),
}

/// Interaction state. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Status {
    #[default]
    Pristine,
    Focused,
    Touched,
}

/// Attributes and state of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<Id> {
    input_type: InputType<Id>,
    identifier: Option<Id>,
    name: Option<String>,
    value: Value,
    is_required: bool,
    label: Option<String>,
    placeholder: Option<String>,
    hint: Option<String>,
    min: Value,
    max: Value,
    step: Value,
    options: Vec<(String, Value)>,
    status: Status,
    repeatable_min: usize,
    repeatable_max: Option<usize>,
    errors: Vec<Error<Id>>,
    pattern: Option<Mask>,
    cursor: Option<usize>,
    classes: Vec<String>,
    add_button_copy: String,
    remove_button_copy: String,
    disabled: bool,
    hidden: bool,
    autocomplete: Option<String>,
}

impl<Id: FieldId> Field<Id> {
    /// Defaults for `input_type` with `attributes` applied in order.
    pub fn init(input_type: InputType<Id>, attributes: impl IntoIterator<Item = Attribute<Id>>) -> Self {
        let mut field = Self {
            input_type,
            identifier: None,
            name: None,
            value: Value::Blank,
            is_required: false,
            label: None,
            placeholder: None,
            hint: None,
            min: Value::Blank,
            max: Value::Blank,
            step: Value::Blank,
            options: Vec::new(),
            status: Status::Pristine,
            repeatable_min: 1,
            repeatable_max: None,
            errors: Vec::new(),
            pattern: None,
            cursor: None,
            classes: Vec::new(),
            add_button_copy: "Add".to_owned(),
            remove_button_copy: "Remove".to_owned(),
            disabled: false,
            hidden: false,
            autocomplete: None,
        };
        for attribute in attributes {
            field.apply(attribute);
        }
        field
    }

    /// Apply attributes, keeping the current identifier whatever they say.
    pub fn update_attributes(&mut self, attributes: impl IntoIterator<Item = Attribute<Id>>) {
        let identifier = self.identifier.take();
        for attribute in attributes {
            self.apply(attribute);
        }
        self.identifier = identifier;
    }

    fn apply(&mut self, attribute: Attribute<Id>) {
        match attribute {
            Attribute::Identifier(id) => self.identifier = Some(id),
            Attribute::Name(name) => self.name = Some(name),
            Attribute::Label(label) => self.label = Some(label),
            Attribute::Placeholder(text) => self.placeholder = Some(text),
            Attribute::Hint(text) => self.hint = Some(text),
            Attribute::Required(required) => self.is_required = required,
            Attribute::Min(value) => self.min = value,
            Attribute::Max(value) => self.max = value,
            Attribute::Step(value) => self.step = value,
            Attribute::Value(value) => self.value = value,
            Attribute::StringValue(input) => self.value = self.input_string_to_value(&input),
            Attribute::Options(options) => self.options = options,
            Attribute::Pattern(mask) => self.pattern = Some(mask),
            Attribute::RepeatableMin(min) => self.repeatable_min = min,
            Attribute::RepeatableMax(max) => self.repeatable_max = max,
            Attribute::AddButtonCopy(copy) => self.add_button_copy = copy,
            Attribute::RemoveButtonCopy(copy) => self.remove_button_copy = copy,
            Attribute::Classes(classes) => self.classes = classes,
            Attribute::Disabled(disabled) => self.disabled = disabled,
            Attribute::Hidden(hidden) => self.hidden = hidden,
            Attribute::Autocomplete(hint) => self.autocomplete = Some(hint),
        }
    }

    // -------------------------------------------------------------------------
    // Derived behaviour
    // -------------------------------------------------------------------------

    /// Whether this node is a `Group` or `Repeatable`.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.input_type, InputType::Group | InputType::Repeatable(_))
    }

    /// Containers are never blank; leaves are blank when their value is.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.is_container() && self.value.is_blank()
    }

    /// Whether a renderer should offer suggestions from `options`.
    #[must_use]
    pub fn is_autocompleteable(&self) -> bool {
        match self.input_type {
            InputType::Text => !self.options.is_empty(),
            InputType::StrictAutocomplete => true,
            _ => false,
        }
    }

    /// Whether the value must come from `options`.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(
            self.input_type,
            InputType::Select | InputType::Radio | InputType::StrictAutocomplete
        )
    }

    /// Coerce raw UI input according to the input type.
    ///
    /// Select and radio input is an option *index*; strict autocomplete
    /// input is an option's display text.
    #[must_use]
    pub fn input_string_to_value(&self, input: &str) -> Value {
        match &self.input_type {
            InputType::Text | InputType::TextArea | InputType::Email | InputType::Password => {
                Value::from_string(input)
            }
            InputType::StrictAutocomplete => {
                if input.trim().is_empty() {
                    Value::Blank
                } else {
                    self.options
                        .iter()
                        .find(|(text, _)| text == input)
                        .map_or(Value::Invalid, |(_, value)| value.clone())
                }
            }
            InputType::Integer => Value::int_from_string(input),
            InputType::Float => Value::float_from_string(input),
            InputType::Month => Value::month_from_string(input),
            InputType::Date => Value::date_from_string(input),
            InputType::LocalDatetime => Value::time_from_string(input),
            InputType::Select | InputType::Radio => input
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| self.options.get(index))
                .map_or(Value::Blank, |(_, value)| value.clone()),
            InputType::Checkbox => match input {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => Value::Blank,
            },
            InputType::Group | InputType::Repeatable(_) => Value::Blank,
        }
    }

    /// The raw input string a renderer would show for the current value;
    /// feeding it back through [`Field::input_string_to_value`] yields the
    /// same value.
    #[must_use]
    pub fn input_string(&self) -> String {
        match &self.input_type {
            InputType::Select | InputType::Radio => self
                .selected_index()
                .map(|index| index.to_string())
                .unwrap_or_default(),
            InputType::StrictAutocomplete => self
                .selected_index()
                .and_then(|index| self.options.get(index))
                .map(|(text, _)| text.clone())
                .unwrap_or_default(),
            _ => self.value.to_string().unwrap_or_default(),
        }
    }

    /// Position of the option whose value equals the current value.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        if self.value.is_blank() {
            return None;
        }
        self.options.iter().position(|(_, value)| *value == self.value)
    }

    /// Errors the user should currently see.
    ///
    /// Range, pattern and options errors always show; containers show
    /// everything; other errors wait until the field is touched.
    #[must_use]
    pub fn visible_errors(&self) -> Vec<&Error<Id>> {
        let show_all = self.is_container() || self.status == Status::Touched;
        self.errors
            .iter()
            .filter(|error| show_all || error.is_always_visible())
            .collect()
    }

    /// All errors on this node folded into one.
    #[must_use]
    pub fn combined_error(&self) -> Option<Error<Id>> {
        Error::combine_all(self.errors.iter().cloned())
    }

    // -------------------------------------------------------------------------
    // Status transitions
    // -------------------------------------------------------------------------

    /// Pristine becomes Focused; later states are kept.
    pub fn focus(&mut self) {
        self.status = self.status.max(Status::Focused);
    }

    /// Marks the field Touched.
    pub fn blur(&mut self) {
        self.status = Status::Touched;
    }

    /// Marks the field Touched.
    pub fn touch(&mut self) {
        self.status = Status::Touched;
    }

    // -------------------------------------------------------------------------
    // State mutation
    // -------------------------------------------------------------------------

    /// Replace the stored value as is, without coercion.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Record where the caret sits after an edit.
    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor;
    }

    /// Replace the error list, dropping duplicates.
    pub fn set_errors(&mut self, errors: Vec<Error<Id>>) {
        self.errors.clear();
        for error in errors {
            crate::error::push_unique(&mut self.errors, error);
        }
    }

    /// Append an error unless an equal one is present.
    pub fn add_error(&mut self, error: Error<Id>) {
        crate::error::push_unique(&mut self.errors, error);
    }

    /// Drop every stored error.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The kind of input, with a repeatable's template.
    #[must_use]
    pub fn input_type(&self) -> &InputType<Id> {
        &self.input_type
    }

    /// Host key used by `find_path_by_id` and error reports.
    #[must_use]
    pub fn identifier(&self) -> Option<&Id> {
        self.identifier.as_ref()
    }

    /// JSON key for this node.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether a blank value fails validation.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text shown while the input is empty.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Help text shown under the input.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Lower bound, `Blank` when unset.
    #[must_use]
    pub fn min(&self) -> &Value {
        &self.min
    }

    /// Upper bound, `Blank` when unset.
    #[must_use]
    pub fn max(&self) -> &Value {
        &self.max
    }

    /// Numeric step for renderers, `Blank` when unset.
    #[must_use]
    pub fn step(&self) -> &Value {
        &self.step
    }

    /// Choice labels paired with their values.
    #[must_use]
    pub fn options(&self) -> &[(String, Value)] {
        &self.options
    }

    /// Interaction status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Fewest entries a repeatable may hold.
    #[must_use]
    pub fn repeatable_min(&self) -> usize {
        self.repeatable_min
    }

    /// Most entries a repeatable may hold, if bounded.
    #[must_use]
    pub fn repeatable_max(&self) -> Option<usize> {
        self.repeatable_max
    }

    /// Template subtree of a repeatable.
    #[must_use]
    pub fn template(&self) -> Option<&FieldTree<Id>> {
        match &self.input_type {
            InputType::Repeatable(template) => Some(template),
            _ => None,
        }
    }

    /// Errors from the last validation or decode.
    #[must_use]
    pub fn errors(&self) -> &[Error<Id>] {
        &self.errors
    }

    /// Input mask, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&Mask> {
        self.pattern.as_ref()
    }

    /// Caret offset left by the last masked edit.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Styling classes for renderers.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Label for a repeatable's add button.
    #[must_use]
    pub fn add_button_copy(&self) -> &str {
        &self.add_button_copy
    }

    /// Label for a repeatable's remove button.
    #[must_use]
    pub fn remove_button_copy(&self) -> &str {
        &self.remove_button_copy
    }

    /// Whether edits are refused.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the node and its subtree are skipped by validation.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Browser autocomplete hint.
    #[must_use]
    pub fn autocomplete(&self) -> Option<&str> {
        self.autocomplete.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tree-wide helpers
// ---------------------------------------------------------------------------

/// Mark every node Touched so all errors become visible.
pub fn touch_tree<Id: FieldId>(tree: &mut FieldTree<Id>) {
    tree.for_each_mut(Field::touch);
}

/// Path of the first node (pre-order) carrying `id`.
#[must_use]
pub fn find_path_by_id<Id: FieldId>(tree: &FieldTree<Id>, id: &Id) -> Option<Vec<usize>> {
    tree.find_path(|field| field.identifier() == Some(id))
}

/// Apply `attributes` to the node carrying `id`. The identifier itself is
/// never rewritten.
pub fn update_with_id<Id: FieldId>(
    tree: &mut FieldTree<Id>,
    id: &Id,
    attributes: impl IntoIterator<Item = Attribute<Id>>,
) -> Result<(), Error<Id>> {
    let Some(path) = find_path_by_id(tree, id) else {
        tracing::debug!(identifier = ?id, "update_with_id: no such field");
        return Err(Error::InputNotFound(id.clone()));
    };
    let attributes: Vec<_> = attributes.into_iter().collect();
    tree.update(&path, |node| node.value_mut().update_attributes(attributes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attr;

    type F = Field<&'static str>;

    fn colours() -> Attribute<&'static str> {
        attr::options([
            ("Red", Value::from("red")),
            ("Green", Value::from("green")),
        ])
    }

    #[test]
    fn init_defaults() {
        let f = F::init(InputType::Text, []);
        assert_eq!(f.status(), Status::Pristine);
        assert!(f.value().is_blank());
        assert!(f.min().is_blank() && f.max().is_blank() && f.step().is_blank());
        assert_eq!(f.repeatable_min(), 1);
        assert_eq!(f.repeatable_max(), None);
        assert!(f.errors().is_empty());
        assert!(f.options().is_empty());
        assert_eq!(f.add_button_copy(), "Add");
    }

    #[test]
    fn init_applies_in_order() {
        let f = F::init(
            InputType::Text,
            [attr::label("First"), attr::label("Second"), attr::required(true)],
        );
        assert_eq!(f.label(), Some("Second"));
        assert!(f.is_required());
    }

    #[test]
    fn update_attributes_preserves_identifier() {
        let mut f = F::init(InputType::Text, [attr::identifier("keep")]);
        f.update_attributes([attr::identifier("clobber"), attr::label("L")]);
        assert_eq!(f.identifier(), Some(&"keep"));
        assert_eq!(f.label(), Some("L"));
    }

    #[test]
    fn containers_are_never_blank() {
        let group = F::init(InputType::Group, []);
        assert!(!group.is_blank());
        let template = Tree::leaf(F::init(InputType::Text, []));
        let rep = F::init(InputType::Repeatable(Box::new(template)), []);
        assert!(!rep.is_blank());
        assert!(rep.template().is_some());
        assert!(F::init(InputType::Text, []).is_blank());
    }

    #[test]
    fn autocompleteable() {
        assert!(!F::init(InputType::Text, []).is_autocompleteable());
        assert!(F::init(InputType::Text, [colours()]).is_autocompleteable());
        assert!(F::init(InputType::StrictAutocomplete, []).is_autocompleteable());
        assert!(!F::init(InputType::Select, [colours()]).is_autocompleteable());
    }

    #[test]
    fn select_resolves_option_index() {
        let f = F::init(InputType::Select, [colours()]);
        assert_eq!(f.input_string_to_value("1"), Value::from("green"));
        assert_eq!(f.input_string_to_value("Green"), Value::Blank);
        assert_eq!(f.input_string_to_value("7"), Value::Blank);
        let radio = F::init(InputType::Radio, [colours()]);
        assert_eq!(radio.input_string_to_value("0"), Value::from("red"));
    }

    #[test]
    fn strict_autocomplete_resolves_display_text() {
        let f = F::init(InputType::StrictAutocomplete, [colours()]);
        assert_eq!(f.input_string_to_value("Red"), Value::from("red"));
        assert_eq!(f.input_string_to_value(""), Value::Blank);
        assert_eq!(f.input_string_to_value("Blue"), Value::Invalid);
    }

    #[test]
    fn checkbox_accepts_literal_booleans() {
        let f = F::init(InputType::Checkbox, []);
        assert_eq!(f.input_string_to_value("true"), Value::Boolean(true));
        assert_eq!(f.input_string_to_value("false"), Value::Boolean(false));
        assert_eq!(f.input_string_to_value("yes"), Value::Blank);
    }

    #[test]
    fn containers_coerce_to_blank() {
        let f = F::init(InputType::Group, []);
        assert_eq!(f.input_string_to_value("anything"), Value::Blank);
    }

    #[test]
    fn string_value_attribute_coerces() {
        let f = F::init(InputType::Integer, [attr::string_value("12")]);
        assert_eq!(f.value(), &Value::Integer(12));
        let s = F::init(InputType::Select, [colours(), attr::string_value("1")]);
        assert_eq!(s.value(), &Value::from("green"));
        assert_eq!(s.selected_index(), Some(1));
        assert_eq!(s.input_string(), "1");
    }

    #[test]
    fn input_string_round_trips() {
        let f = F::init(InputType::Date, [attr::string_value("2024-05-06")]);
        assert_eq!(f.input_string_to_value(&f.input_string()), *f.value());
        let auto = F::init(InputType::StrictAutocomplete, [colours(), attr::value(Value::from("green"))]);
        assert_eq!(auto.input_string(), "Green");
    }

    #[test]
    fn status_moves_forward_only() {
        let mut f = F::init(InputType::Text, []);
        f.focus();
        assert_eq!(f.status(), Status::Focused);
        f.blur();
        assert_eq!(f.status(), Status::Touched);
        f.focus();
        assert_eq!(f.status(), Status::Touched);
    }

    #[test]
    fn visible_errors_respect_status() {
        let mut f = F::init(InputType::Integer, [attr::identifier("n")]);
        f.set_errors(vec![
            Error::IsBlank(Some("n")),
            Error::PatternError(Some("n")),
            Error::IsBlank(Some("n")),
        ]);
        assert_eq!(f.errors().len(), 2);
        assert_eq!(f.visible_errors(), vec![&Error::PatternError(Some("n"))]);
        f.touch();
        assert_eq!(f.visible_errors().len(), 2);
    }

    #[test]
    fn container_errors_always_visible() {
        let mut g = F::init(InputType::Group, []);
        g.add_error(Error::ParseError(None));
        assert_eq!(g.visible_errors().len(), 1);
    }

    #[test]
    fn update_with_id_and_touch_tree() {
        let mut tree = Tree::leaf(F::init(InputType::Group, []))
            .child(Tree::leaf(F::init(InputType::Text, [attr::identifier("a")])));
        assert!(update_with_id(&mut tree, &"a", [attr::label("A")]).is_ok());
        assert_eq!(tree.get_value(&[0]).and_then(Field::label), Some("A"));
        assert_eq!(
            update_with_id(&mut tree, &"zz", [attr::label("Z")]),
            Err(Error::InputNotFound("zz"))
        );
        touch_tree(&mut tree);
        assert!(tree.iter().all(|f| f.status() == Status::Touched));
    }
}
