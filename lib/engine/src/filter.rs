// Candidate filters applied to over-fetched neighbors
use modelmatch_schema::RepresentativeProfile;

pub trait CandidateFilter {
    /// `position` is the candidate's insertion position in the index
    fn accepts(&self, position: usize, candidate: &RepresentativeProfile) -> bool;
}

/// Drops the query item itself and every item of the query's brand
pub struct CrossBrandFilter<'a> {
    query_position: usize,
    query: &'a RepresentativeProfile,
}

impl<'a> CrossBrandFilter<'a> {
    pub fn new(query_position: usize, query: &'a RepresentativeProfile) -> Self {
        Self {
            query_position,
            query,
        }
    }
}

impl CandidateFilter for CrossBrandFilter<'_> {
    fn accepts(&self, position: usize, candidate: &RepresentativeProfile) -> bool {
        position != self.query_position && !self.query.same_brand(candidate)
    }
}
