/// Common reporting behaviour for every error the compiler can produce.
pub trait JackErr {
    /// Log the error through the `log` facade.
    fn emit(&self);

    /// Render the error as a single human readable line.
    fn to_msg(&self) -> String;
}
