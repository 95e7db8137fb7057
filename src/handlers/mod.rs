// handlers/mod.rs - two security tiers
//
// public: no token required (/ping, /health, /v1/auth/*)
// protected: JWT required, caller injected as AuthUser (/v1/lists, /v1/items, /v1/userLists)
pub mod protected;
pub mod public;
