//! Constructor injection: the morning newspaper
//!
//! [`TightlyCoupledHouse`] is built around one specific agent and can only
//! ever get its paper from that agent. [`House`] instead receives a
//! [`NewsAgentProvider`] and asks it for whichever agent serves the owner,
//! so the agency (or a test double) can be swapped without touching the house.
//!
//! Neither house builds its own dependencies; the caller wires the graph.

use crate::error::{FrameworkError, Result};
use std::fmt;
use std::sync::Arc;

/// Who lives in the house
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseOwnerDetails {
    /// Owner's name
    pub name: String,
}

impl HouseOwnerDetails {
    /// Owner called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A delivered paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newspaper {
    /// Owner it was delivered to
    pub owner: String,
    /// Agent who delivered it
    pub delivered_by: String,
}

/// Delivers newspapers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewspaperAgent {
    /// Agent's name
    pub name: String,
}

impl NewspaperAgent {
    /// Agent called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Hand over today's paper
    #[must_use]
    pub fn give_newspaper(&self, owner: &HouseOwnerDetails) -> Newspaper {
        Newspaper {
            owner: owner.name.clone(),
            delivered_by: self.name.clone(),
        }
    }
}

/// House wired directly to one agent
#[derive(Debug, Clone)]
pub struct TightlyCoupledHouse {
    owner: HouseOwnerDetails,
    agent: NewspaperAgent,
}

impl TightlyCoupledHouse {
    /// House for `owner`, served only by `agent`
    #[must_use]
    pub const fn new(owner: HouseOwnerDetails, agent: NewspaperAgent) -> Self {
        Self { owner, agent }
    }

    /// Take the paper from the one agent this house knows
    #[must_use]
    pub fn start_morning_activities(&self) -> Newspaper {
        self.agent.give_newspaper(&self.owner)
    }
}

/// Anything that can assign an agent to a house owner
pub trait NewsAgentProvider: Send + Sync {
    /// Agent responsible for `owner`
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::NoAgentAvailable`] if nobody can deliver.
    fn news_agent_for(&self, owner: &HouseOwnerDetails) -> Result<NewspaperAgent>;
}

/// Agency with a fixed roster of agents
#[derive(Debug, Clone)]
pub struct NewsAgency {
    name: String,
    agents: Vec<NewspaperAgent>,
}

impl NewsAgency {
    /// Agency with an empty roster
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agents: Vec::new(),
        }
    }

    /// Add `agent` to the roster
    #[must_use]
    pub fn with_agent(mut self, agent: NewspaperAgent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Agency name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agents on the roster, in registration order
    #[must_use]
    pub fn agents(&self) -> &[NewspaperAgent] {
        &self.agents
    }
}

impl NewsAgentProvider for NewsAgency {
    fn news_agent_for(&self, owner: &HouseOwnerDetails) -> Result<NewspaperAgent> {
        if self.agents.is_empty() {
            return Err(FrameworkError::NoAgentAvailable {
                agency: self.name.clone(),
            });
        }

        // Same owner, same agent, every morning
        let slot = owner.name.bytes().map(usize::from).sum::<usize>() % self.agents.len();
        Ok(self.agents[slot].clone())
    }
}

/// House that receives its newspaper agency
#[derive(Clone)]
pub struct House {
    owner: HouseOwnerDetails,
    agency: Arc<dyn NewsAgentProvider>,
}

impl fmt::Debug for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("House")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

impl House {
    /// House for `owner`, served through `agency`
    #[must_use]
    pub fn new(owner: HouseOwnerDetails, agency: Arc<dyn NewsAgentProvider>) -> Self {
        Self { owner, agency }
    }

    /// Who lives here
    #[must_use]
    pub const fn owner(&self) -> &HouseOwnerDetails {
        &self.owner
    }

    /// Ask the agency for an agent, then take the paper
    ///
    /// # Errors
    ///
    /// Propagates the agency's error when no agent can be assigned.
    pub fn start_morning_activities(&self) -> Result<Newspaper> {
        let agent = self.agency.news_agent_for(&self.owner)?;
        Ok(agent.give_newspaper(&self.owner))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gotham() -> NewsAgency {
        NewsAgency::new("Gotham Publications")
            .with_agent(NewspaperAgent::new("Alfred"))
            .with_agent(NewspaperAgent::new("Lucius"))
    }

    /// Always sends the same stand-in and counts how often it was asked
    #[derive(Default)]
    struct StubAgency {
        asked: AtomicUsize,
    }

    impl NewsAgentProvider for StubAgency {
        fn news_agent_for(&self, _owner: &HouseOwnerDetails) -> Result<NewspaperAgent> {
            let _ = self.asked.fetch_add(1, Ordering::SeqCst);
            Ok(NewspaperAgent::new("Stand-in"))
        }
    }

    #[test]
    fn test_coupled_house_always_uses_its_agent() {
        let house = TightlyCoupledHouse::new(
            HouseOwnerDetails::new("Batman"),
            NewspaperAgent::new("Alfred"),
        );
        let paper = house.start_morning_activities();
        assert_eq!(paper.owner, "Batman");
        assert_eq!(paper.delivered_by, "Alfred");
    }

    #[test]
    fn test_house_gets_paper_through_agency() {
        let agency = Arc::new(gotham());
        let house = House::new(HouseOwnerDetails::new("Batman"), agency.clone());

        let paper = house.start_morning_activities().unwrap();

        assert_eq!(paper.owner, "Batman");
        assert!(agency.agents().iter().any(|a| a.name == paper.delivered_by));
    }

    #[test]
    fn test_agency_assignment_is_stable() {
        let agency = gotham();
        let owner = HouseOwnerDetails::new("Batman");
        let first = agency.news_agent_for(&owner).unwrap();
        let second = agency.news_agent_for(&owner).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_agency_without_agents_cannot_deliver() {
        let house = House::new(
            HouseOwnerDetails::new("Batman"),
            Arc::new(NewsAgency::new("Empty Press")),
        );

        let err = house.start_morning_activities().unwrap_err();

        assert_eq!(
            err,
            FrameworkError::NoAgentAvailable {
                agency: "Empty Press".to_string()
            }
        );
    }

    #[test]
    fn test_agency_can_be_swapped_for_a_stub() {
        let stub = Arc::new(StubAgency::default());
        let house = House::new(HouseOwnerDetails::new("Batman"), stub.clone());

        let paper = house.start_morning_activities().unwrap();

        assert_eq!(paper.delivered_by, "Stand-in");
        assert_eq!(stub.asked.load(Ordering::SeqCst), 1);
    }
}
