// ABOUTME: Scenario tests for the preview lifecycle driven through fake collaborators
// ABOUTME: Covers the user-visible flows, tree registration and cross-thread delivery
