use super::*;
use std::fmt;
use std::fmt::Display;
use std::fmt::Write;

/// Builder returned by `serialize()` methods, printing a node as GraphQL syntax
#[derive(Debug, Clone)]
pub struct Serialize<'a, T> {
    pub(crate) node: &'a T,
    pub(crate) config: Config<'a>,
}

#[derive(Debug, Clone)]
pub(crate) struct Config<'a> {
    indent_prefix: Option<&'a str>,
    initial_indent_level: usize,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            indent_prefix: Some("  "),
            initial_indent_level: 0,
        }
    }
}

impl<'a, T> Serialize<'a, T> {
    /// Enable indentation and line breaks.
    ///
    /// `prefix` is repeated at the start of each line by the number of indentation levels.
    /// The default is `"  "`, two spaces.
    pub fn indent_prefix(mut self, prefix: &'a str) -> Self {
        self.config.indent_prefix = Some(prefix);
        self
    }

    /// Disable indentation and line breaks
    pub fn no_indent(mut self) -> Self {
        self.config.indent_prefix = None;
        self
    }

    pub fn initial_indent_level(mut self, initial_indent_level: usize) -> Self {
        self.config.initial_indent_level = initial_indent_level;
        self
    }
}

/// Output sink tracking the current indentation.
///
/// With no indent prefix everything goes on one line,
/// and line breaks inside blocks turn into single spaces.
struct Printer<'a> {
    indent_prefix: Option<&'a str>,
    level: usize,
    out: &'a mut dyn Write,
}

impl Printer<'_> {
    fn str(&mut self, text: &str) -> fmt::Result {
        self.out.write_str(text)
    }

    fn display(&mut self, value: impl Display) -> fmt::Result {
        write!(self.out, "{value}")
    }

    fn multi_line(&self) -> bool {
        self.indent_prefix.is_some()
    }

    fn indentation(&mut self) -> fmt::Result {
        if let Some(prefix) = self.indent_prefix {
            for _ in 0..self.level {
                self.out.write_str(prefix)?
            }
        }
        Ok(())
    }

    /// A newline at the current level, or `inline` on a single line
    fn line_break(&mut self, inline: &str) -> fmt::Result {
        if self.multi_line() {
            self.out.write_char('\n')?;
            self.indentation()
        } else {
            self.out.write_str(inline)
        }
    }

    fn single_line<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let indent_prefix = self.indent_prefix.take();
        let result = f(self);
        self.indent_prefix = indent_prefix;
        result
    }

    /// `{ a b c }`, one item per line when multi-line
    fn block<T>(
        &mut self,
        items: &[T],
        print: impl Fn(&mut Self, &T) -> fmt::Result,
    ) -> fmt::Result {
        self.str("{")?;
        if !items.is_empty() {
            self.level += 1;
            for item in items {
                self.line_break(" ")?;
                print(self, item)?;
            }
            self.level -= 1;
            self.line_break(" ")?;
        }
        self.str("}")
    }

    /// `[a, b, c]`, one item per line with a trailing comma when multi-line
    fn list<T>(
        &mut self,
        open: &str,
        close: &str,
        items: &[T],
        print: impl Fn(&mut Self, &T) -> fmt::Result,
    ) -> fmt::Result {
        self.str(open)?;
        if !items.is_empty() {
            self.level += 1;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    self.str(",")?;
                }
                self.line_break(if index > 0 { " " } else { "" })?;
                print(self, item)?;
            }
            if self.multi_line() {
                self.str(",")?;
            }
            self.level -= 1;
            self.line_break("")?;
        }
        self.str(close)
    }

    fn arguments(&mut self, arguments: &[Node<Argument>]) -> fmt::Result {
        if arguments.is_empty() {
            return Ok(());
        }
        self.single_line(|p| p.list("(", ")", arguments, |p, argument| argument.print(p)))
    }

    /// Strings are always printed quoted on a single line, never as block strings
    fn string(&mut self, value: &str) -> fmt::Result {
        self.out.write_char('"')?;
        for c in value.chars() {
            match c {
                '"' => self.str("\\\"")?,
                '\\' => self.str("\\\\")?,
                '\n' => self.str("\\n")?,
                '\r' => self.str("\\r")?,
                '\u{8}' => self.str("\\b")?,
                '\u{c}' => self.str("\\f")?,
                '\t' => self.out.write_char(c)?,
                c if c < ' ' => write!(self.out, "\\u{:04X}", u32::from(c))?,
                c => self.out.write_char(c)?,
            }
        }
        self.out.write_char('"')
    }
}

trait Print {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result;
}

impl Print for OperationDefinition {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        let Self {
            operation_type,
            name,
            variables,
            directives,
            selection_set,
        } = self;
        p.str(operation_type.name())?;
        if let Some(name) = name {
            p.str(" ")?;
            p.str(name)?;
        }
        if !variables.is_empty() {
            p.single_line(|p| p.list("(", ")", variables, |p, variable| variable.print(p)))?
        }
        directives.print(p)?;
        p.str(" ")?;
        selection_set.print(p)
    }
}

impl Print for VariableDefinition {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        let Self {
            name,
            ty,
            default_value,
            directives,
        } = self;
        p.str("$")?;
        p.str(name)?;
        p.str(": ")?;
        p.display(ty)?;
        if let Some(value) = default_value {
            p.str(" = ")?;
            value.print(p)?
        }
        directives.print(p)
    }
}

impl Print for DirectiveList {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        self.iter().try_for_each(|directive| {
            p.str(" ")?;
            directive.print(p)
        })
    }
}

impl Print for Directive {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.str("@")?;
        p.str(&self.name)?;
        p.arguments(&self.arguments)
    }
}

impl Print for SelectionSet {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.block(&self.selections, |p, selection| selection.print(p))
    }
}

impl Print for Selection {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        match self {
            Selection::Field(field) => field.print(p),
            Selection::InlineFragment(fragment) => fragment.print(p),
        }
    }
}

impl Print for Field {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        let Self {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        } = self;
        if let Some(alias) = alias {
            p.str(alias)?;
            p.str(": ")?;
        }
        p.str(name)?;
        p.arguments(arguments)?;
        directives.print(p)?;
        if let Some(selection_set) = selection_set {
            p.str(" ")?;
            selection_set.print(p)?
        }
        Ok(())
    }
}

impl Print for InlineFragment {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.str("...")?;
        if let Some(type_name) = &self.type_condition {
            p.str(" on ")?;
            p.str(type_name)?;
        }
        self.directives.print(p)?;
        p.str(" ")?;
        self.selection_set.print(p)
    }
}

impl Print for Argument {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        p.str(&self.name)?;
        p.str(": ")?;
        self.value.print(p)
    }
}

impl Print for Value {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        match self {
            Value::Null => p.str("null"),
            Value::Boolean(value) => p.display(value),
            Value::Enum(name) => p.str(name),
            Value::Variable(name) => {
                p.str("$")?;
                p.str(name)
            }
            Value::String(value) => p.string(value),
            Value::Float(value) => p.display(value),
            Value::Int(value) => p.display(value),
            Value::List(items) => p.list("[", "]", items, |p, item| item.print(p)),
            Value::Object(fields) => p.list("{", "}", fields, |p, (name, value)| {
                p.str(name)?;
                p.str(": ")?;
                value.print(p)
            }),
        }
    }
}

impl<T: Print> Print for Node<T> {
    fn print(&self, p: &mut Printer<'_>) -> fmt::Result {
        T::print(self, p)
    }
}

macro_rules! impl_display {
    ($($ty: ty)+) => {
        $(
            /// Serialize to GraphQL syntax with the default configuration
            impl Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.serialize().fmt(f)
                }
            }

            /// Serialize to GraphQL syntax
            impl Display for Serialize<'_, $ty> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let mut printer = Printer {
                        indent_prefix: self.config.indent_prefix,
                        level: self.config.initial_indent_level,
                        out: f,
                    };
                    // Later lines are indented by `line_break`
                    printer.indentation()?;
                    self.node.print(&mut printer)
                }
            }
        )+
    }
}

impl_display! {
    OperationDefinition
    VariableDefinition
    DirectiveList
    Directive
    SelectionSet
    Selection
    Field
    InlineFragment
    Argument
    Value
}
