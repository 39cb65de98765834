// Library exports for varhit
pub mod batch;
pub mod gene_model;
pub mod input;
pub mod report;
pub mod scan;
pub mod variant_index;
