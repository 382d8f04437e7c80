mod live_roster_test;
