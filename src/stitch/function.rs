//! Shader subroutine IR: functions, their formal inputs, and call sites.

use std::collections::HashMap;

use super::{error::CompositionError, text::indent_source};

/// Formal parameter of a [`Function`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInput {
    pub ty: String,
    pub name: String,
}

impl FunctionInput {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// A named shader subroutine.
///
/// Both dialects share C-style function syntax, so declaration and definition
/// text is dialect independent. Identity is the name: callers guarantee names
/// are unique within one rendered shader (the stitcher does this by mangling).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub body: String,
    pub inputs: Vec<FunctionInput>,
    pub return_type: String,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        body: impl Into<String>,
        inputs: Vec<FunctionInput>,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            inputs,
            return_type: return_type.into(),
        }
    }

    /// `returnType name(type input, ...)`
    pub fn declaration(&self) -> String {
        let inputs = self
            .inputs
            .iter()
            .map(|input| format!("{} {}", input.ty, input.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({})", self.return_type, self.name, inputs)
    }

    /// Full subroutine text, body indented one level.
    pub fn definition(&self) -> String {
        format!(
            "{}\n{{\n{}\n}}",
            self.declaration(),
            indent_source(&self.body, 1)
        )
    }

    /// Render a call expression, substituting each formal input with the
    /// caller-supplied actual expression.
    pub fn call_string(
        &self,
        input_mappings: &HashMap<String, String>,
    ) -> Result<String, CompositionError> {
        let mut actuals: Vec<&str> = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let Some(actual) = input_mappings.get(&input.name) else {
                return Err(CompositionError::UnboundInput {
                    function: self.name.clone(),
                    input: input.name.clone(),
                });
            };
            actuals.push(actual.as_str());
        }
        Ok(format!("{}({})", self.name, actuals.join(", ")))
    }

    pub(crate) fn renamed(&self, name: String) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }
}

/// Binds a [`Function`] to an output variable and a set of actual inputs.
///
/// Each call emits exactly one statement that declares the output variable
/// with the function's return type and assigns the call result to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionCall {
    pub function: Function,
    pub output_name: String,
    /// Formal input name -> actual expression (a variable name or a literal).
    pub inputs: HashMap<String, String>,
}

impl FunctionCall {
    pub fn new<K, V>(
        function: Function,
        output_name: impl Into<String>,
        inputs: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            function,
            output_name: output_name.into(),
            inputs: inputs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn call_string(&self) -> Result<String, CompositionError> {
        self.function.call_string(&self.inputs)
    }

    /// `returnType output = name(actuals);`
    pub fn statement(&self) -> Result<String, CompositionError> {
        Ok(format!(
            "{} {} = {};",
            self.function.return_type,
            self.output_name,
            self.call_string()?
        ))
    }
}
