pub mod catalogo;
pub mod lote;
