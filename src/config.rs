/// How strictly operations named `set...` are recognised as setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetterArity {
    /// Any `set...` operation is a setter regardless of its parameters.
    ///
    /// A zero-parameter setter whose name matches a getter makes the
    /// assignment fail with [`InvokeError::MissingParameter`].
    ///
    /// [`InvokeError::MissingParameter`]: crate::InvokeError::MissingParameter
    #[default]
    Lenient,
    /// Only `set...` operations with exactly one parameter are setters.
    /// Everything else is skipped silently.
    Strict,
}

/// Options for a [`Mapper`](crate::Mapper)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapperConfig {
    pub setter_arity: SetterArity,
}

impl MapperConfig {
    /// Creates the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_propmap::{MapperConfig, SetterArity};
    ///
    /// let config = MapperConfig::new();
    /// assert_eq!(config.setter_arity, SetterArity::Lenient);
    ///
    /// let config = config.setter_arity(SetterArity::Strict);
    /// assert_eq!(config.setter_arity, SetterArity::Strict);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the setter arity policy
    pub fn setter_arity(mut self, arity: SetterArity) -> Self {
        self.setter_arity = arity;
        self
    }
}
