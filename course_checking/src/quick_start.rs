/*!

# Quick start

This example checks a small race end to end. Two competitors run the same
course, one of them skips a control.

Write the race description in a file called `race.json`:

```json
{
    "name": "Club evening",
    "courses": [{"name": "Long", "controls": ["31", "32", "33"]}],
    "groups": [{"name": "M21", "course": "Long"}],
    "persons": [
        {"name": "John", "surname": "Doe", "bib": 12, "card": 2045678, "group": "M21"},
        {"name": "Jane", "surname": "Roe", "bib": 7, "card": 2045679, "group": "M21"}
    ]
}
```

The readout station wrote the punches of both cards to `backup.txt`, one
block per card:

```text
start
2045678
10:01:00
10:37:25
split_start
31 10:11:10
32 10:19:45
33 10:30:05
split_end
end
start
2045679

10:32:00
split_start
31 10:08:15
33 10:25:40
split_end
end
```

Run `sorgcheck` with both files:

```bash
sorgcheck -i race.json --readout backup.txt
```

The program logs its progress and prints the summary:

```text
[2026-04-18T09:12:41Z INFO  sorgcheck::sorg] Attempting to read race file "race.json"
[2026-04-18T09:12:41Z INFO  sorgcheck::sorg] Attempting to read race file "backup.txt"
[2026-04-18T09:12:41Z INFO  sorgcheck::sorg] Merged 2 readouts from "backup.txt", 0 without a competitor
[2026-04-18T09:12:41Z INFO  course_checking] Checking 2 results
[2026-04-18T09:12:41Z INFO  sorgcheck::sorg] Checked 2 results: 1 ok, 1 disqualified, 0 did not finish, 0 without a person
stats:{
  "config": {
    "date": null,
    "didNotFinish": "0",
    "disqualified": "1",
    "location": null,
    "noPerson": "0",
    "ok": "1",
    "race": "Club evening",
    "total": "2"
  },
  "results": [
    {
      "bib": 7,
      "card": 2045679,
      "finishTime": "10:32:00",
      "group": "M21",
      "name": "Roe Jane",
      "status": "Disqualified"
    },
    {
      "bib": 12,
      "card": 2045678,
      "finishTime": "10:37:25",
      "group": "M21",
      "name": "Doe John",
      "status": "OK"
    }
  ]
}
```

Jane punched 31 and 33 but not 32, so her result is rejected. John visited
all three controls in order and is accepted.

Write the summary to a file with `-o summary.json`. Once a run has been
checked by hand, its summary makes a good regression reference for the next
runs:

```bash
sorgcheck -i race.json --readout backup.txt --reference summary.json
```

Any difference against the reference is printed as a diff and fails the
run.

The full description of the file formats, the control code templates and
the configuration file is in the [manual](crate::manual).

*/
