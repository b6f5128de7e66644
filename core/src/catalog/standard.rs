use super::{
    Catalog, CatalogError, arith_ops, compare_ops, logic_ops, math_ops, memory_ops,
};

impl Catalog {
    /// Builds the standard operator set.
    ///
    /// Order is significant: lookups are first-fit, so families registered
    /// earlier shadow later signatures that match the same types.
    pub fn standard() -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();
        memory_ops::register_reads(&mut catalog)?;
        memory_ops::register_writes(&mut catalog)?;
        memory_ops::register_casts(&mut catalog)?;
        memory_ops::register_remote_reads(&mut catalog)?;
        memory_ops::register_remote_writes(&mut catalog)?;
        math_ops::register_functions(&mut catalog)?;
        compare_ops::register_same_type(&mut catalog)?;
        logic_ops::register_logic(&mut catalog)?;
        arith_ops::register_float_arithmetic(&mut catalog)?;
        arith_ops::register_neg(&mut catalog)?;
        logic_ops::register_not(&mut catalog)?;
        arith_ops::register_integer_arithmetic(&mut catalog)?;
        compare_ops::register_mixed(&mut catalog)?;
        memory_ops::register_converting_writes(&mut catalog)?;
        math_ops::register_mixed_pow(&mut catalog)?;

        tracing::debug!(operators = catalog.len(), "operator catalog built");
        Ok(catalog)
    }
}
