use std::fmt;
use std::fmt::Display;

/// Indentation-aware writer used to print operation documents.
pub(crate) struct State<'fmt, 'fmt2> {
    indent_level: usize,
    output: &'fmt mut fmt::Formatter<'fmt2>,
}

impl<'a, 'b> State<'a, 'b> {
    pub(crate) fn new(output: &'a mut fmt::Formatter<'b>) -> State<'a, 'b> {
        Self {
            indent_level: 0,
            output,
        }
    }

    pub(crate) fn write<T: Display>(&mut self, value: T) -> fmt::Result {
        write!(self.output, "{}", value)
    }

    pub(crate) fn new_line(&mut self) -> fmt::Result {
        self.write("\n")?;
        for _ in 0..self.indent_level {
            self.write("  ")?
        }
        Ok(())
    }

    fn indent_no_new_line(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) -> fmt::Result {
        self.indent_level -= 1;
        self.new_line()
    }
}

/// Writes ` { ... }` with one indented line per value. Writes nothing for an empty slice.
pub(crate) fn write_block<T>(
    state: &mut State<'_, '_>,
    values: &[T],
    mut write_line: impl FnMut(&mut State<'_, '_>, &T) -> fmt::Result,
) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    state.write(" {")?;
    state.indent_no_new_line();
    for value in values {
        state.new_line()?;
        write_line(state, value)?;
    }
    state.dedent()?;
    state.write("}")
}

/// Displays items separated by `, `, between `open` and `close`.
pub(crate) struct DisplaySeparated<'a, T> {
    pub(crate) open: &'static str,
    pub(crate) items: &'a [T],
    pub(crate) close: &'static str,
}

impl<T: Display> Display for DisplaySeparated<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.open)?;
        let mut iter = self.items.iter();
        if let Some(item) = iter.next() {
            write!(f, "{item}")?;
        }
        iter.try_for_each(|item| write!(f, ", {item}"))?;
        f.write_str(self.close)
    }
}
