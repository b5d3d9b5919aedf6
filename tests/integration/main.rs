//! Integration tests across layers
//!
//! Complete pipelines from triples through rules, filters, and record
//! construction.

mod pipeline;

use recflow_triples::Triple;

/// Two bibliographic records as triples.
pub fn catalogue() -> Vec<Triple> {
    vec![
        Triple::new("urn:1", "title", "Faust"),
        Triple::entity("urn:1", "creator", "{ name: Goethe, role: author }"),
        Triple::new("urn:1", "type", "drama"),
        Triple::new("urn:2", "title", "Die Leiden des jungen Werthers"),
        Triple::entity("urn:2", "creator", "{ name: Goethe, role: author }"),
        Triple::new("urn:2", "type", "novel"),
        Triple::new("urn:3", "title", "Untitled"),
    ]
}
