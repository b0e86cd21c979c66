//! Behaviour suites for channel clients and servers.
